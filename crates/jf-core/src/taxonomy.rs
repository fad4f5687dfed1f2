//! Curated skill/tool reference data for growth-marketing leadership roles,
//! kept intentionally compact for high-signal extraction. Pure data plus
//! lookups; no scoring behavior lives here.

use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use strsim::damerau_levenshtein;
use unicode_normalization::UnicodeNormalization;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillEntry {
    pub name: String,
    pub canonical: String,
    pub category: String,
    pub aliases: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolEntry {
    pub name: String,
    pub canonical: String,
    pub category: String,
    pub aliases: Vec<String>,
}

/// How a dictionary lookup hit was found. Drives classifier confidence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchKind {
    Name,
    Alias,
    Fuzzy,
}

type RawEntry = (&'static str, &'static str, &'static str, &'static [&'static str]);

const SKILL_TABLE: &[RawEntry] = &[
    // Strategy & leadership
    ("Growth Strategy", "growth_strategy", "Strategy", &["growth planning", "growth roadmap", "scaling strategy"]),
    ("Go-to-Market Strategy", "go_to_market_strategy", "Strategy", &["gtm", "gtm strategy", "go to market", "launch strategy"]),
    ("Product Marketing", "product_marketing", "Strategy", &["product marketing strategy"]),
    ("Brand Strategy", "brand_strategy", "Strategy", &["brand development", "brand positioning"]),
    ("Messaging & Positioning", "messaging_positioning", "Strategy", &["positioning", "value proposition", "messaging"]),
    ("Pricing Strategy", "pricing_strategy", "Strategy", &["pricing optimization", "monetization strategy"]),
    ("Market Research", "market_research", "Strategy", &["market analysis", "consumer research", "market intelligence"]),
    ("Competitive Analysis", "competitive_analysis", "Strategy", &["competitive intelligence", "competitor analysis"]),
    ("ICP Definition", "icp_definition", "Strategy", &["icp", "ideal customer profile"]),
    ("Customer Journey Mapping", "customer_journey_mapping", "Strategy", &["journey mapping", "customer journey"]),
    // Growth & acquisition
    ("Demand Generation", "demand_generation", "Growth", &["demand gen", "pipeline generation", "pipeline growth"]),
    ("Lead Generation", "lead_generation", "Growth", &["lead gen", "lead acquisition", "inbound leads"]),
    ("Customer Acquisition", "customer_acquisition", "Growth", &["user acquisition", "acquisition strategy"]),
    ("Customer Retention", "customer_retention", "Growth", &["retention", "churn reduction"]),
    ("Lifecycle Marketing", "lifecycle_marketing", "Growth", &["lifecycle", "customer lifecycle"]),
    ("Conversion Rate Optimization", "conversion_rate_optimization", "Growth", &["cro", "conversion optimization"]),
    ("Funnel Optimization", "funnel_optimization", "Growth", &["funnel analysis", "conversion funnel", "marketing funnels"]),
    ("Experimentation", "experimentation", "Growth", &["test and learn", "incrementality testing"]),
    ("A/B Testing", "ab_testing", "Growth", &["a/b testing", "split testing", "multivariate testing"]),
    ("Product-Led Growth", "product_led_growth", "Growth", &["plg", "product led growth"]),
    ("Sales-Led Growth", "sales_led_growth", "Growth", &["slg", "sales led growth"]),
    // Channels
    ("Content Marketing", "content_marketing", "Channels", &["content strategy", "editorial strategy"]),
    ("Digital Marketing", "digital_marketing", "Channels", &["online marketing", "digital marketing strategy"]),
    ("SEO", "seo", "Channels", &["search engine optimization", "organic search"]),
    ("SEM", "sem", "Channels", &["search engine marketing", "search ads"]),
    ("Paid Media Strategy", "paid_media_strategy", "Channels", &["performance media", "media strategy"]),
    ("Paid Social Advertising", "paid_social_advertising", "Channels", &["paid social", "social ads"]),
    ("Paid Search Advertising", "paid_search_advertising", "Channels", &["paid search", "ppc"]),
    ("Email Marketing", "email_marketing", "Channels", &["email campaigns", "email automation"]),
    ("Community Marketing", "community_marketing", "Channels", &["community building", "community-led growth"]),
    ("Partner Marketing", "partner_marketing", "Channels", &["partner-led growth", "alliances marketing", "abm"]),
    ("Influencer Marketing", "influencer_marketing", "Channels", &["creator marketing", "influencer programs"]),
    ("Performance Marketing", "performance_marketing", "Channels", &["growth marketing", "performance acquisition"]),
    // Operations
    ("Marketing Automation", "marketing_automation", "Operations", &["automation workflows"]),
    ("CRM Strategy", "crm_strategy", "Operations", &["crm", "crm planning"]),
    ("Marketing Operations", "marketing_operations", "Operations", &["mops", "marketing ops", "growth operations", "growth ops"]),
    ("Revenue Operations", "revenue_operations", "Operations", &["revops", "revenue ops"]),
    ("Lead Scoring", "lead_scoring", "Operations", &["lead qualification", "mql scoring"]),
    ("Campaign Management", "campaign_management", "Operations", &["campaign execution", "campaign planning"]),
    // Analytics & measurement
    ("Marketing Analytics", "marketing_analytics", "Analytics", &["marketing analysis", "campaign analytics"]),
    ("Attribution Modeling", "attribution_modeling", "Analytics", &["multi-touch attribution", "attribution analysis"]),
    ("Media Mix Modeling", "media_mix_modeling", "Analytics", &["mmm", "marketing mix modeling"]),
    ("Segmentation", "segmentation", "Analytics", &["customer segmentation", "audience segmentation"]),
    ("Cohort Analysis", "cohort_analysis", "Analytics", &["cohort analytics"]),
    ("LTV Analysis", "ltv_analysis", "Analytics", &["ltv", "clv", "lifetime value"]),
    ("CAC Analysis", "cac_analysis", "Analytics", &["cac", "customer acquisition cost"]),
    ("Data Analysis", "data_analysis", "Analytics", &["data analytics"]),
    ("SQL", "sql", "Analytics", &["structured query language"]),
    ("Python", "python", "Analytics", &["python scripting"]),
];

const TOOL_TABLE: &[RawEntry] = &[
    ("Salesforce", "salesforce", "CRM", &["sfdc", "salesforce crm"]),
    ("HubSpot", "hubspot", "CRM", &["hubspot crm"]),
    ("Pipedrive", "pipedrive", "CRM", &[]),
    ("Marketo", "marketo", "Automation", &["adobe marketo"]),
    ("Pardot", "pardot", "Automation", &["account engagement"]),
    ("Braze", "braze", "Automation", &[]),
    ("Iterable", "iterable", "Automation", &[]),
    ("Klaviyo", "klaviyo", "Automation", &[]),
    ("Customer.io", "customer_io", "Automation", &["customerio"]),
    ("Zapier", "zapier", "Automation", &[]),
    ("Google Analytics", "google_analytics", "Analytics", &["ga", "ga4", "universal analytics"]),
    ("Amplitude", "amplitude", "Analytics", &[]),
    ("Mixpanel", "mixpanel", "Analytics", &[]),
    ("Segment", "segment", "Analytics", &["twilio segment"]),
    ("Tableau", "tableau", "BI", &[]),
    ("Looker", "looker", "BI", &["looker studio", "data studio"]),
    ("Power BI", "power_bi", "BI", &["powerbi"]),
    ("Google Ads", "google_ads", "Ads", &["adwords", "google adwords"]),
    ("Meta Ads", "meta_ads", "Ads", &["facebook ads", "facebook ads manager"]),
    ("LinkedIn Ads", "linkedin_ads", "Ads", &["linkedin campaign manager"]),
    ("Optimizely", "optimizely", "Experimentation", &[]),
    ("Hotjar", "hotjar", "Experimentation", &[]),
    ("Ahrefs", "ahrefs", "SEO", &[]),
    ("Semrush", "semrush", "SEO", &["sem rush"]),
    ("Webflow", "webflow", "Web", &[]),
    ("Airtable", "airtable", "Operations", &[]),
];

/// Phrases rejected outright: soft skills and job-ad filler never enter the
/// skill buckets.
static SOFT_SKILL_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"team\s+player",
        r"communication\s+skills?",
        r"interpersonal\s+skills?",
        r"self[\s-]starter",
        r"detail[\s-]oriented",
        r"attention\s+to\s+detail",
        r"work\s+ethic",
        r"fast[\s-]paced",
        r"problem[\s-]solv(?:er|ing)",
        r"critical\s+think(?:er|ing)",
        r"passionate",
        r"highly\s+motivated",
        r"leadership\s+qualities",
        r"people\s+skills?",
        r"team\s+building",
        r"collaborat(?:ive|ion)",
        r"adaptab(?:le|ility)",
        r"multitask(?:er|ing)?",
    ]
    .iter()
    .map(|p| Regex::new(&format!("(?i){p}")).unwrap())
    .collect()
});

/// Product override: these phrases classify as core skills no matter what
/// other layers would say.
const FORCED_CORE_SKILLS: &[&str] = &["sql", "python", "excel"];

/// Direct abbreviation -> canonical-name mapping for common shorthand that
/// appears outside dictionary aliases.
static CANONICAL_RULES: LazyLock<HashMap<&'static str, &'static str>> = LazyLock::new(|| {
    HashMap::from([
        ("cro", "conversion_rate_optimization"),
        ("gtm", "go_to_market_strategy"),
        ("ppc", "paid_search_advertising"),
        ("mops", "marketing_operations"),
        ("revops", "revenue_operations"),
        ("icp", "icp_definition"),
        ("ltv", "ltv_analysis"),
        ("clv", "ltv_analysis"),
        ("cac", "cac_analysis"),
        ("mmm", "media_mix_modeling"),
        ("plg", "product_led_growth"),
        ("slg", "sales_led_growth"),
        ("abm", "partner_marketing"),
        ("split testing", "ab_testing"),
    ])
});

fn nfkc_lower_trim(input: &str) -> String {
    input.nfkc().collect::<String>().trim().to_lowercase()
}

/// Canonical form: normalized, deduplication-ready key (lowercase,
/// underscored, alphanumeric only).
pub fn canonicalize(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut last_sep = true;
    for c in nfkc_lower_trim(input).chars() {
        if c.is_ascii_alphanumeric() {
            out.push(c);
            last_sep = false;
        } else if !last_sep {
            out.push('_');
            last_sep = true;
        }
    }
    while out.ends_with('_') {
        out.pop();
    }
    out
}

/// Separator-free key used for tolerant alias lookup ("A/B Testing" and
/// "ab-testing" collapse to the same key).
fn compact_key(input: &str) -> String {
    input
        .nfkc()
        .collect::<String>()
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect()
}

#[derive(Debug, Clone)]
struct Dictionary<E> {
    entries: Vec<E>,
    // lowercase name / canonical / alias -> (entry index, how it matched)
    lookup: HashMap<String, (usize, MatchKind)>,
    // separator-free alias -> entry index, for tolerant and fuzzy matching
    compact: HashMap<String, usize>,
}

impl<E> Dictionary<E> {
    fn build(entries: Vec<E>, keys: impl Fn(&E) -> (String, String, Vec<String>)) -> Self {
        let mut lookup = HashMap::new();
        let mut compact = HashMap::new();

        for (idx, entry) in entries.iter().enumerate() {
            let (name, canonical, aliases) = keys(entry);
            lookup.entry(name.to_lowercase()).or_insert((idx, MatchKind::Name));
            lookup.entry(canonical.clone()).or_insert((idx, MatchKind::Name));
            compact.entry(compact_key(&name)).or_insert(idx);
            for alias in aliases {
                lookup
                    .entry(alias.to_lowercase())
                    .or_insert((idx, MatchKind::Alias));
                compact.entry(compact_key(&alias)).or_insert(idx);
            }
        }

        Self {
            entries,
            lookup,
            compact,
        }
    }

    fn find(&self, phrase: &str) -> Option<(&E, MatchKind)> {
        let normalized = nfkc_lower_trim(phrase);
        if let Some(&(idx, kind)) = self.lookup.get(&normalized) {
            return Some((&self.entries[idx], kind));
        }
        if let Some(&(idx, kind)) = self.lookup.get(&canonicalize(phrase)) {
            return Some((&self.entries[idx], kind));
        }

        let compact = compact_key(phrase);
        if let Some(&idx) = self.compact.get(&compact) {
            return Some((&self.entries[idx], MatchKind::Alias));
        }
        self.fuzzy_find(&compact)
            .map(|idx| (&self.entries[idx], MatchKind::Fuzzy))
    }

    /// Damerau-Levenshtein fallback for light typos. Short tokens are only
    /// matched via the exact lookups above to avoid false positives on brief
    /// or ambiguous inputs.
    fn fuzzy_find(&self, compact: &str) -> Option<usize> {
        if compact.len() < 5 {
            return None;
        }

        let mut best: Option<(usize, usize)> = None;
        for (alias, &idx) in &self.compact {
            if alias.len() < 5 {
                continue;
            }

            let distance = damerau_levenshtein(compact, alias);
            if distance == 0 {
                return Some(idx);
            }

            let len = compact.len().max(alias.len());
            let acceptable = distance == 1 || (len >= 8 && distance == 2);
            if !acceptable {
                continue;
            }

            match best {
                None => best = Some((idx, distance)),
                Some((_, best_dist)) if distance < best_dist => best = Some((idx, distance)),
                _ => {}
            }
        }

        best.map(|(idx, _)| idx)
    }
}

/// The full reference-data bundle, passed by reference into the classifier
/// and scorers so synthetic taxonomies can be injected in tests.
#[derive(Debug, Clone)]
pub struct Taxonomy {
    skills: Dictionary<SkillEntry>,
    tools: Dictionary<ToolEntry>,
    soft_skill_patterns: Vec<Regex>,
    forced_core_skills: HashSet<String>,
}

impl Default for Taxonomy {
    fn default() -> Self {
        Self::builtin()
    }
}

impl Taxonomy {
    /// The built-in curated dictionaries.
    pub fn builtin() -> Self {
        Self::with_dictionaries(
            SKILL_TABLE.iter().map(raw_skill).collect(),
            TOOL_TABLE.iter().map(raw_tool).collect(),
        )
    }

    /// Custom dictionaries with the built-in rejection patterns and forced
    /// overrides retained.
    pub fn with_dictionaries(skills: Vec<SkillEntry>, tools: Vec<ToolEntry>) -> Self {
        Self {
            skills: Dictionary::build(skills, |e| {
                (e.name.clone(), e.canonical.clone(), e.aliases.clone())
            }),
            tools: Dictionary::build(tools, |e| {
                (e.name.clone(), e.canonical.clone(), e.aliases.clone())
            }),
            soft_skill_patterns: SOFT_SKILL_PATTERNS.clone(),
            forced_core_skills: FORCED_CORE_SKILLS.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// No dictionary entries at all; pattern layers still apply.
    pub fn empty() -> Self {
        Self::with_dictionaries(Vec::new(), Vec::new())
    }

    pub fn skills(&self) -> &[SkillEntry] {
        &self.skills.entries
    }

    pub fn tools(&self) -> &[ToolEntry] {
        &self.tools.entries
    }

    pub fn lookup_skill(&self, phrase: &str) -> Option<(&SkillEntry, MatchKind)> {
        self.skills.find(phrase)
    }

    pub fn lookup_tool(&self, phrase: &str) -> Option<(&ToolEntry, MatchKind)> {
        self.tools.find(phrase)
    }

    /// Returns the matched pattern (for classifier evidence) when the phrase
    /// is a soft skill.
    pub fn match_soft_skill(&self, phrase: &str) -> Option<String> {
        let normalized = nfkc_lower_trim(phrase);
        self.soft_skill_patterns
            .iter()
            .find(|p| p.is_match(&normalized))
            .map(|p| p.as_str().trim_start_matches("(?i)").to_string())
    }

    pub fn is_forced_core_skill(&self, phrase: &str) -> bool {
        self.forced_core_skills.contains(&nfkc_lower_trim(phrase))
    }

    /// Resolve a shorthand via the canonical-rules table ("cro" ->
    /// "conversion_rate_optimization").
    pub fn canonical_rule(&self, phrase: &str) -> Option<&'static str> {
        CANONICAL_RULES.get(nfkc_lower_trim(phrase).as_str()).copied()
    }

    /// Normalize the user's declared skills to the same canonical space the
    /// classifier emits, so bucket matching compares like with like.
    pub fn normalize_skill_set(&self, items: &[String]) -> HashSet<String> {
        items
            .iter()
            .filter(|s| !s.trim().is_empty())
            .map(|s| match self.lookup_skill(s) {
                Some((entry, _)) => entry.canonical.clone(),
                None => self
                    .canonical_rule(s)
                    .map(str::to_string)
                    .unwrap_or_else(|| canonicalize(s)),
            })
            .collect()
    }

    pub fn normalize_tool_set(&self, items: &[String]) -> HashSet<String> {
        items
            .iter()
            .filter(|s| !s.trim().is_empty())
            .map(|s| match self.lookup_tool(s) {
                Some((entry, _)) => entry.canonical.clone(),
                None => canonicalize(s),
            })
            .collect()
    }
}

fn raw_skill(raw: &RawEntry) -> SkillEntry {
    SkillEntry {
        name: raw.0.to_string(),
        canonical: raw.1.to_string(),
        category: raw.2.to_string(),
        aliases: raw.3.iter().map(|a| a.to_string()).collect(),
    }
}

fn raw_tool(raw: &RawEntry) -> ToolEntry {
    ToolEntry {
        name: raw.0.to_string(),
        canonical: raw.1.to_string(),
        category: raw.2.to_string(),
        aliases: raw.3.iter().map(|a| a.to_string()).collect(),
    }
}
