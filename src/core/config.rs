use crate::constants::{CATCH_ALL_SUFFIX, DEFAULT_NONCE_LENGTH};
use crate::core::header::{CspHeaderSerializer, HeaderSerializer};
use crate::core::policy::CspPolicy;
use crate::error::CspError;
use crate::monitoring::stats::CspStats;
use crate::render::probe::{HeaderPrerenderProbe, PrerenderProbe};
use crate::security::nonce::NonceGenerator;
use arc_swap::ArcSwap;
use indexmap::IndexMap;
use parking_lot::RwLock;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::{
    borrow::Cow,
    fs::File,
    io::{BufReader, Read},
    path::Path,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
};

/// A configuration switch that can be left out, turned off with `false`, or given a value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Setting<T> {
    Unset,
    Disabled,
    Enabled(T),
}

impl<T> Setting<T> {
    #[inline]
    pub const fn is_unset(&self) -> bool {
        matches!(self, Setting::Unset)
    }

    #[inline]
    pub fn as_enabled(&self) -> Option<&T> {
        match self {
            Setting::Enabled(value) => Some(value),
            _ => None,
        }
    }
}

impl<T> Default for Setting<T> {
    fn default() -> Self {
        Setting::Unset
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum SettingRepr<T> {
    Flag(bool),
    Value(T),
}

impl<'de, T> Deserialize<'de> for Setting<T>
where
    T: Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match SettingRepr::deserialize(deserializer)? {
            SettingRepr::Flag(false) => Setting::Disabled,
            SettingRepr::Flag(true) => Setting::Unset,
            SettingRepr::Value(value) => Setting::Enabled(value),
        })
    }
}

impl<T> Serialize for Setting<T>
where
    T: Serialize,
{
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Setting::Unset => serializer.serialize_bool(true),
            Setting::Disabled => serializer.serialize_bool(false),
            Setting::Enabled(value) => value.serialize(serializer),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecurityHeaders {
    #[serde(default, skip_serializing_if = "Setting::is_unset")]
    pub content_security_policy: Setting<CspPolicy>,
}

/// Security options attached to one route pattern.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteSecurity {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nonce: Option<bool>,
    #[serde(default, skip_serializing_if = "Setting::is_unset")]
    pub headers: Setting<SecurityHeaders>,
}

impl RouteSecurity {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn with_nonce(mut self, enabled: bool) -> Self {
        self.nonce = Some(enabled);
        self
    }

    pub fn with_policy(mut self, policy: CspPolicy) -> Self {
        self.headers = Setting::Enabled(SecurityHeaders {
            content_security_policy: Setting::Enabled(policy),
        });
        self
    }

    pub fn without_policy(mut self) -> Self {
        self.headers = Setting::Enabled(SecurityHeaders {
            content_security_policy: Setting::Disabled,
        });
        self
    }

    #[inline]
    pub fn without_headers(mut self) -> Self {
        self.headers = Setting::Disabled;
        self
    }
}

/// Effective settings for one request after merging every matching route rule.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedSecurity {
    pub nonce: bool,
    pub policy: Option<CspPolicy>,
}

impl ResolvedSecurity {
    #[inline]
    pub fn new(policy: Option<CspPolicy>, nonce: bool) -> Self {
        Self { nonce, policy }
    }

    fn apply(&mut self, rule: &RouteSecurity) {
        if let Some(nonce) = rule.nonce {
            self.nonce = nonce;
        }

        let csp = match &rule.headers {
            Setting::Unset => return,
            Setting::Disabled => {
                self.policy = None;
                return;
            }
            Setting::Enabled(headers) => &headers.content_security_policy,
        };

        match csp {
            Setting::Unset => {}
            Setting::Disabled => self.policy = None,
            Setting::Enabled(policy) => match &mut self.policy {
                Some(existing) => existing.merge(policy),
                None => self.policy = Some(policy.clone()),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum PatternKind {
    Exact(String),
    Prefix(String),
}

/// Route pattern: an exact path, or a prefix followed by `/**`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutePattern {
    raw: Cow<'static, str>,
    kind: PatternKind,
}

impl RoutePattern {
    pub fn new(pattern: impl Into<Cow<'static, str>>) -> Self {
        let raw = pattern.into();
        let kind = match raw.strip_suffix(CATCH_ALL_SUFFIX) {
            Some(prefix) => PatternKind::Prefix(trim_trailing_slash(prefix).to_owned()),
            None => PatternKind::Exact(trim_trailing_slash(&raw).to_owned()),
        };
        Self { raw, kind }
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn matches(&self, path: &str) -> bool {
        let path = trim_trailing_slash(path);
        match &self.kind {
            PatternKind::Exact(exact) => path == exact,
            PatternKind::Prefix(prefix) if prefix.is_empty() => true,
            PatternKind::Prefix(prefix) => {
                path == prefix
                    || (path.starts_with(prefix.as_str())
                        && path.as_bytes().get(prefix.len()) == Some(&b'/'))
            }
        }
    }

    /// Less specific patterns sort first so that later ones override them.
    fn specificity(&self) -> (bool, usize) {
        match &self.kind {
            PatternKind::Prefix(prefix) => (false, prefix.len()),
            PatternKind::Exact(exact) => (true, exact.len()),
        }
    }
}

fn trim_trailing_slash(path: &str) -> &str {
    match path.strip_suffix('/') {
        Some(trimmed) if !trimmed.is_empty() => trimmed,
        Some(_) => "",
        None => path,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteRule {
    pattern: RoutePattern,
    security: RouteSecurity,
}

impl RouteRule {
    #[inline]
    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }

    #[inline]
    pub fn security(&self) -> &RouteSecurity {
        &self.security
    }
}

/// Ordered route rules, deserialized from `{ "<pattern>": { "security": { ... } } }`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteRules {
    rules: Vec<RouteRule>,
}

#[derive(Deserialize)]
struct RouteRuleEntry {
    #[serde(default)]
    security: Option<RouteSecurity>,
}

impl<'de> Deserialize<'de> for RouteRules {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let entries = IndexMap::<String, RouteRuleEntry>::deserialize(deserializer)?;
        let mut rules = RouteRules::new();
        for (pattern, entry) in entries {
            if let Some(security) = entry.security {
                rules.push(pattern, security);
            }
        }
        Ok(rules)
    }
}

impl RouteRules {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// One rule matching every path.
    pub fn global(security: RouteSecurity) -> Self {
        Self::new().rule("/**", security)
    }

    #[inline]
    pub fn rule(mut self, pattern: impl Into<Cow<'static, str>>, security: RouteSecurity) -> Self {
        self.push(pattern, security);
        self
    }

    pub fn push(&mut self, pattern: impl Into<Cow<'static, str>>, security: RouteSecurity) {
        self.rules.push(RouteRule {
            pattern: RoutePattern::new(pattern),
            security,
        });
    }

    pub fn remove(&mut self, pattern: &str) -> bool {
        let before = self.rules.len();
        self.rules.retain(|rule| rule.pattern() != pattern);
        before != self.rules.len()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &RouteRule> {
        self.rules.iter()
    }

    pub fn resolve(&self, path: &str) -> ResolvedSecurity {
        let mut matching: Vec<&RouteRule> = self
            .rules
            .iter()
            .filter(|rule| rule.pattern.matches(path))
            .collect();
        matching.sort_by_key(|rule| rule.pattern.specificity());

        matching
            .into_iter()
            .fold(ResolvedSecurity::default(), |mut resolved, rule| {
                resolved.apply(&rule.security);
                resolved
            })
    }

    pub fn from_json_str(json: &str) -> Result<Self, CspError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, CspError> {
        Ok(serde_json::from_reader(reader)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, CspError> {
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }
}

type UpdateFn = Box<dyn Fn(&RouteRules) + Send + Sync + 'static>;

#[derive(Clone)]
pub struct CspConfig {
    rules: Arc<ArcSwap<RouteRules>>,
    nonce_generator: Arc<NonceGenerator>,
    prerender_probe: Arc<dyn PrerenderProbe>,
    serializer: Arc<dyn HeaderSerializer>,
    stats: Arc<CspStats>,
    update_listeners: Arc<RwLock<Vec<(usize, UpdateFn)>>>,
    next_listener_id: Arc<AtomicUsize>,
}

impl CspConfig {
    pub fn new(rules: RouteRules) -> Self {
        Self {
            rules: Arc::new(ArcSwap::from_pointee(rules)),
            nonce_generator: Arc::new(NonceGenerator::new(DEFAULT_NONCE_LENGTH)),
            prerender_probe: Arc::new(HeaderPrerenderProbe::default()),
            serializer: Arc::new(CspHeaderSerializer),
            stats: Arc::new(CspStats::new()),
            update_listeners: Arc::new(RwLock::new(Vec::new())),
            next_listener_id: Arc::new(AtomicUsize::new(0)),
        }
    }

    #[inline]
    pub fn rules(&self) -> Arc<RouteRules> {
        self.rules.load_full()
    }

    #[inline]
    pub fn resolve(&self, path: &str) -> ResolvedSecurity {
        self.rules.load().resolve(path)
    }

    /// Applies `f` to a copy of the current rules and publishes the result.
    /// In-flight requests keep the snapshot they already resolved.
    pub fn update_rules<F>(&self, f: F)
    where
        F: FnOnce(&mut RouteRules),
    {
        let mut rules = self.rules.load().as_ref().clone();
        f(&mut rules);
        self.replace_rules(rules);
    }

    pub fn replace_rules(&self, rules: RouteRules) {
        let rules = Arc::new(rules);
        self.rules.store(rules.clone());

        for (_, listener) in self.update_listeners.read().iter() {
            listener(&rules);
        }

        self.stats.increment_rules_update_count();
        log::debug!("CSP route rules updated ({} rules)", rules.len());
    }

    pub fn add_update_listener<F>(&self, f: F) -> usize
    where
        F: Fn(&RouteRules) + Send + Sync + 'static,
    {
        let id = self.next_listener_id.fetch_add(1, Ordering::SeqCst);
        self.update_listeners.write().push((id, Box::new(f)));
        id
    }

    pub fn remove_update_listener(&self, id: usize) -> bool {
        let mut listeners = self.update_listeners.write();
        let before = listeners.len();
        listeners.retain(|(listener_id, _)| *listener_id != id);
        before != listeners.len()
    }

    pub fn generate_nonce(&self) -> Result<String, CspError> {
        let nonce = self.nonce_generator.generate()?;
        self.stats.increment_nonce_generation_count();
        Ok(nonce)
    }

    #[inline]
    pub fn nonce_generator(&self) -> &Arc<NonceGenerator> {
        &self.nonce_generator
    }

    #[inline]
    pub fn prerender_probe(&self) -> &Arc<dyn PrerenderProbe> {
        &self.prerender_probe
    }

    #[inline]
    pub fn serializer(&self) -> &Arc<dyn HeaderSerializer> {
        &self.serializer
    }

    #[inline]
    pub fn stats(&self) -> &Arc<CspStats> {
        &self.stats
    }
}

impl Default for CspConfig {
    fn default() -> Self {
        Self::new(RouteRules::new())
    }
}

#[derive(Default)]
pub struct CspConfigBuilder {
    rules: Option<RouteRules>,
    nonce_length: Option<usize>,
    nonce_generator: Option<Arc<NonceGenerator>>,
    prerender_header: Option<Cow<'static, str>>,
    prerender_probe: Option<Arc<dyn PrerenderProbe>>,
    serializer: Option<Arc<dyn HeaderSerializer>>,
    stats: Option<Arc<CspStats>>,
}

impl CspConfigBuilder {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn rules(mut self, rules: RouteRules) -> Self {
        self.rules = Some(rules);
        self
    }

    pub fn rule(mut self, pattern: impl Into<Cow<'static, str>>, security: RouteSecurity) -> Self {
        self.rules
            .get_or_insert_with(RouteRules::new)
            .push(pattern, security);
        self
    }

    /// Shortcut for a single catch-all rule.
    pub fn policy(self, policy: CspPolicy, nonce: bool) -> Self {
        self.rule(
            "/**",
            RouteSecurity::new().with_policy(policy).with_nonce(nonce),
        )
    }

    #[inline]
    pub fn with_nonce_length(mut self, length: usize) -> Self {
        self.nonce_length = Some(length);
        self
    }

    #[inline]
    pub fn with_prebuilt_nonce_generator(mut self, generator: Arc<NonceGenerator>) -> Self {
        self.nonce_generator = Some(generator);
        self
    }

    #[inline]
    pub fn with_prerender_header(mut self, header: impl Into<Cow<'static, str>>) -> Self {
        self.prerender_header = Some(header.into());
        self
    }

    #[inline]
    pub fn with_prerender_probe(mut self, probe: Arc<dyn PrerenderProbe>) -> Self {
        self.prerender_probe = Some(probe);
        self
    }

    #[inline]
    pub fn with_serializer(mut self, serializer: Arc<dyn HeaderSerializer>) -> Self {
        self.serializer = Some(serializer);
        self
    }

    #[inline]
    pub fn with_stats(mut self, stats: Arc<CspStats>) -> Self {
        self.stats = Some(stats);
        self
    }

    pub fn build(self) -> Result<CspConfig, CspError> {
        let mut config = CspConfig::new(self.rules.unwrap_or_default());

        if let Some(generator) = self.nonce_generator {
            config.nonce_generator = generator;
        } else if let Some(length) = self.nonce_length {
            if length == 0 {
                return Err(CspError::ConfigError(
                    "nonce length must be greater than zero".to_string(),
                ));
            }
            config.nonce_generator = Arc::new(NonceGenerator::new(length));
        }

        if let Some(probe) = self.prerender_probe {
            config.prerender_probe = probe;
        } else if let Some(header) = self.prerender_header {
            config.prerender_probe = Arc::new(HeaderPrerenderProbe::new(&header)?);
        }

        if let Some(serializer) = self.serializer {
            config.serializer = serializer;
        }

        if let Some(stats) = self.stats {
            config.stats = stats;
        }

        Ok(config)
    }
}
