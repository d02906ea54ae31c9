//! Static keyword taxonomies consumed by the classifier.
//!
//! The lists are data, not logic: defaults are provided and any list can be
//! replaced from JSON configuration.

use serde::{Deserialize, Serialize};

use crate::errors::ConfigError;

/// A named group of keywords.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordGroup {
    /// Group name (e.g. `ai`, `cloud`).
    pub name: String,
    /// Keywords, matched case-insensitively.
    pub keywords: Vec<String>,
}

impl KeywordGroup {
    /// Creates a group from string slices.
    #[must_use]
    pub fn new(name: &str, keywords: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            keywords: to_strings(keywords),
        }
    }
}

/// Keyword lists for every label group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Taxonomy {
    /// Broad tech categories, in evaluation order.
    #[serde(default = "default_tech_categories")]
    pub tech_categories: Vec<KeywordGroup>,
    /// Niche tech terms.
    #[serde(default = "default_niche_terms")]
    pub niche_terms: Vec<String>,
    /// Entertainment keywords.
    #[serde(default = "default_entertainment")]
    pub entertainment: Vec<String>,
    /// Sports keywords.
    #[serde(default = "default_sports")]
    pub sports: Vec<String>,
    /// News and politics keywords.
    #[serde(default = "default_news")]
    pub news: Vec<String>,
    /// Health keywords.
    #[serde(default = "default_health")]
    pub health: Vec<String>,
    /// Business and finance keywords.
    #[serde(default = "default_business")]
    pub business: Vec<String>,
    /// Countries and cities.
    #[serde(default = "default_locations")]
    pub locations: Vec<String>,
    /// Tokens that mark a term as freshly trending.
    #[serde(default = "default_trending_indicators")]
    pub trending_indicators: Vec<String>,
}

fn to_strings(words: &[&str]) -> Vec<String> {
    words.iter().map(|w| (*w).to_string()).collect()
}

fn default_tech_categories() -> Vec<KeywordGroup> {
    vec![
        KeywordGroup::new(
            "programming",
            &[
                "javascript", "python", "react", "nodejs", "typescript", "vue", "angular",
                "docker", "kubernetes", "microservices", "api", "graphql", "rest", "git",
                "github", "gitlab", "devops", "ci/cd", "jenkins",
            ],
        ),
        KeywordGroup::new(
            "ai",
            &[
                "artificial intelligence", "machine learning", "deep learning",
                "neural network", "tensorflow", "pytorch", "openai", "chatgpt", "gpt", "llm",
                "nlp", "computer vision", "reinforcement learning", "transformer", "bert",
                "stable diffusion", "midjourney", "dall-e",
            ],
        ),
        KeywordGroup::new(
            "blockchain",
            &[
                "blockchain", "cryptocurrency", "bitcoin", "ethereum", "nft", "defi",
                "smart contract", "web3", "dao", "metaverse", "solidity", "polygon",
                "binance", "coinbase", "metamask", "opensea",
            ],
        ),
        KeywordGroup::new(
            "cloud",
            &[
                "aws", "azure", "google cloud", "gcp", "serverless", "lambda",
                "cloud computing", "saas", "paas", "iaas", "edge computing", "cdn",
                "load balancer", "auto scaling",
            ],
        ),
        KeywordGroup::new(
            "cybersecurity",
            &[
                "cybersecurity", "infosec", "penetration testing", "ethical hacking",
                "vulnerability", "malware", "ransomware", "phishing", "zero day",
                "encryption", "vpn", "firewall", "intrusion detection", "siem",
            ],
        ),
        KeywordGroup::new(
            "iot",
            &[
                "internet of things", "iot", "raspberry pi", "arduino", "sensor",
                "embedded systems", "edge device", "smart home", "wearable", "beacon", "mqtt",
                "zigbee", "bluetooth", "wifi 6",
            ],
        ),
        KeywordGroup::new(
            "emerging",
            &[
                "quantum computing", "augmented reality", "virtual reality", "ar", "vr",
                "mixed reality", "hologram", "5g", "6g", "edge ai", "neuromorphic",
                "biocomputing", "dna storage", "photonic computing",
            ],
        ),
        KeywordGroup::new(
            "data",
            &[
                "big data", "data science", "analytics", "business intelligence",
                "data warehouse", "etl", "apache spark", "hadoop", "kafka", "elasticsearch",
                "mongodb", "postgresql", "redis", "cassandra",
            ],
        ),
    ]
}

fn default_niche_terms() -> Vec<String> {
    to_strings(&[
        // Frontend frameworks and tooling
        "svelte", "solid.js", "qwik", "astro", "remix", "next.js", "nuxt", "vite", "esbuild",
        "turbo", "nx", "lerna", "rush",
        // Backend
        "rust", "go", "deno", "bun", "fastapi", "nestjs", "express", "spring boot", "django",
        "flask", "laravel", "symfony",
        // Storage
        "supabase", "planetscale", "neon", "cockroachdb", "dgraph", "neo4j", "arangodb",
        "influxdb", "timescaledb",
        // Ops
        "terraform", "ansible", "helm", "istio", "prometheus", "grafana", "jaeger", "zipkin",
        "consul", "vault", "nomad",
        // AI tooling
        "hugging face", "langchain", "vector database", "pinecone", "weaviate", "chroma",
        "embeddings", "fine-tuning", "rag", "prompt engineering",
    ])
}

fn default_entertainment() -> Vec<String> {
    to_strings(&[
        "celebrity", "actor", "actress", "singer", "musician", "artist", "movie", "film",
        "tv show", "series", "music", "album", "concert", "award", "oscar", "grammy", "netflix",
        "disney", "marvel", "dc", "star wars", "game of thrones",
    ])
}

fn default_sports() -> Vec<String> {
    to_strings(&[
        "football", "soccer", "basketball", "baseball", "tennis", "golf", "olympics",
        "world cup", "nfl", "nba", "mlb", "nhl", "fifa", "uefa", "premier league",
        "champions league", "super bowl", "playoffs",
    ])
}

fn default_news() -> Vec<String> {
    to_strings(&[
        "election", "president", "politics", "government", "congress", "senate", "vote",
        "campaign", "policy", "law", "court", "judge", "scandal", "breaking news", "crisis",
        "protest", "war", "conflict",
    ])
}

fn default_health() -> Vec<String> {
    to_strings(&[
        "health", "medical", "doctor", "hospital", "disease", "virus", "vaccine", "covid",
        "pandemic", "medicine", "treatment", "symptoms", "diagnosis",
    ])
}

fn default_business() -> Vec<String> {
    to_strings(&[
        "stock", "market", "economy", "finance", "investment", "crypto", "bitcoin", "company",
        "business", "ceo", "earnings", "profit", "loss", "merger", "acquisition", "ipo",
        "nasdaq", "dow jones", "sp500",
    ])
}

fn default_locations() -> Vec<String> {
    to_strings(&[
        "united states", "usa", "america", "canada", "mexico", "brazil", "argentina", "uk",
        "england", "france", "germany", "italy", "spain", "russia", "china", "japan", "korea",
        "india", "australia", "new zealand", "south africa", "new york", "los angeles",
        "chicago", "houston", "phoenix", "philadelphia", "san antonio", "san diego", "dallas",
        "san jose", "austin", "jacksonville", "london", "paris", "berlin", "madrid", "rome",
        "moscow", "tokyo", "beijing", "mumbai", "delhi", "sydney", "melbourne", "toronto",
        "vancouver",
    ])
}

fn default_trending_indicators() -> Vec<String> {
    to_strings(&["new", "latest", "2024", "2025", "beta", "alpha", "preview"])
}

impl Default for Taxonomy {
    fn default() -> Self {
        Self {
            tech_categories: default_tech_categories(),
            niche_terms: default_niche_terms(),
            entertainment: default_entertainment(),
            sports: default_sports(),
            news: default_news(),
            health: default_health(),
            business: default_business(),
            locations: default_locations(),
            trending_indicators: default_trending_indicators(),
        }
    }
}

impl Taxonomy {
    /// Returns a copy with every keyword lowercased and trimmed, and empty
    /// keywords dropped (an empty keyword would match everything).
    #[must_use]
    pub fn normalized(&self) -> Self {
        fn clean(words: &[String]) -> Vec<String> {
            words
                .iter()
                .map(|w| w.trim().to_lowercase())
                .filter(|w| !w.is_empty())
                .collect()
        }
        Self {
            tech_categories: self
                .tech_categories
                .iter()
                .map(|group| KeywordGroup {
                    name: group.name.clone(),
                    keywords: clean(&group.keywords),
                })
                .collect(),
            niche_terms: clean(&self.niche_terms),
            entertainment: clean(&self.entertainment),
            sports: clean(&self.sports),
            news: clean(&self.news),
            health: clean(&self.health),
            business: clean(&self.business),
            locations: clean(&self.locations),
            trending_indicators: clean(&self.trending_indicators),
        }
    }

    /// Parses a taxonomy from JSON; omitted lists keep their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Names of the tech categories, in order.
    #[must_use]
    pub fn tech_category_names(&self) -> Vec<&str> {
        self.tech_categories.iter().map(|g| g.name.as_str()).collect()
    }
}
