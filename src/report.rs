//! Field schema of the calm.profile report template.
//!
//! The rendering pipeline lives elsewhere; this module owns the key set it
//! consumes. Every field has a kind and a default (an em-dash for text, zero
//! for numbers, an empty list for lists) so a partially filled mapping can
//! still be rendered without unresolved placeholders.

use serde::Serialize;
use serde_json::{Map, Value};

/// Placeholder shown for missing text fields
pub const TEXT_DEFAULT: &str = "\u{2014}";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    Text,
    Integer,
    Float,
    List,
}

impl FieldKind {
    pub fn default_value(self) -> Value {
        match self {
            FieldKind::Text => Value::from(TEXT_DEFAULT),
            FieldKind::Integer => Value::from(0),
            FieldKind::Float => Value::from(0.0),
            FieldKind::List => Value::Array(Vec::new()),
        }
    }

    /// Integers are accepted where floats are expected.
    pub fn accepts(self, value: &Value) -> bool {
        match self {
            FieldKind::Text => value.is_string(),
            FieldKind::Integer => value.is_i64() || value.is_u64(),
            FieldKind::Float => value.is_number(),
            FieldKind::List => value.is_array(),
        }
    }

    fn name(self) -> &'static str {
        match self {
            FieldKind::Text => "text",
            FieldKind::Integer => "integer",
            FieldKind::Float => "float",
            FieldKind::List => "list",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldSpec {
    pub name: String,
    pub kind: FieldKind,
    pub default: Value,
}

impl FieldSpec {
    fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            kind,
            default: kind.default_value(),
        }
    }
}

fn add(fields: &mut Vec<FieldSpec>, names: &[&str], kind: FieldKind) {
    fields.extend(names.iter().map(|n| FieldSpec::new(*n, kind)));
}

/// The complete template key set, in template order.
pub fn schema() -> Vec<FieldSpec> {
    use FieldKind::*;

    let mut fields = Vec::with_capacity(200);

    add(
        &mut fields,
        &[
            "company_name",
            "assessment_date",
            "report_id",
            "assessment_id",
            "completion_date",
            "customer_email",
            "archetype_primary",
        ],
        Text,
    );
    add(&mut fields, &["archetype_confidence"], Float);
    add(&mut fields, &["archetype_tagline"], Text);
    add(
        &mut fields,
        &[
            "archetype_mix_primary",
            "archetype_mix_secondary",
            "archetype_mix_tertiary",
            "archetype_mix_quaternary",
        ],
        Float,
    );
    add(
        &mut fields,
        &["archetype_secondary", "archetype_tertiary", "archetype_quaternary"],
        Text,
    );
    add(
        &mut fields,
        &["axis_structure", "axis_collaboration", "axis_scope", "axis_tempo"],
        Integer,
    );
    add(
        &mut fields,
        &["overhead_percentage", "annual_cost", "weekly_cost", "hours_lost_ppw"],
        Float,
    );
    add(&mut fields, &["team_size"], Integer);
    add(&mut fields, &["meeting_load"], Text);
    add(&mut fields, &["hourly_rate"], Float);
    add(&mut fields, &["platform"], Text);

    // recommendations r1..r5
    for i in 1..=5 {
        for suffix in ["title", "description", "effort", "impact", "timeline"] {
            fields.push(FieldSpec::new(format!("r{}_{}", i, suffix), Text));
        }
        fields.push(FieldSpec::new(format!("r{}_rice", i), Integer));
        fields.push(FieldSpec::new(format!("r{}_linked_finding", i), Text));
    }

    add(&mut fields, &["break_even_timeline"], Text);
    add(&mut fields, &["team_multiplier"], Integer);
    add(&mut fields, &["confidence_score"], Float);
    add(&mut fields, &["response_count"], Integer);
    add(&mut fields, &["top_findings"], List);
    add(&mut fields, &["radar_insights"], Text);
    add(
        &mut fields,
        &["time_productive", "time_meetings", "time_admin", "time_context_switch"],
        Integer,
    );

    // RASCI roles per workflow
    for i in 1..=5 {
        for role in ["r", "a", "s", "c", "i"] {
            fields.push(FieldSpec::new(format!("workflow{}_{}", i, role), Text));
        }
    }

    for i in 1..=5 {
        for suffix in ["issue", "evidence", "impact", "root_cause", "preview"] {
            fields.push(FieldSpec::new(format!("f{}_{}", i, suffix), Text));
        }
    }

    add(
        &mut fields,
        &[
            "efficiency_planning",
            "efficiency_execution",
            "efficiency_review",
            "efficiency_communication",
        ],
        Integer,
    );
    add(&mut fields, &["workflow_bottlenecks"], Text);
    add(&mut fields, &["base_overhead", "archetype_adjustment"], Float);

    for pct in [25, 50, 75] {
        for suffix in ["margin", "cost", "hours"] {
            fields.push(FieldSpec::new(format!("sensitivity_{}_{}", pct, suffix), Float));
        }
    }

    add(
        &mut fields,
        &[
            "conservative_5yr",
            "realistic_5yr",
            "optimistic_5yr",
            "savings_month1",
            "savings_month3",
            "savings_month6",
            "savings_month12",
        ],
        Float,
    );
    add(
        &mut fields,
        &[
            "critical_path",
            "milestone_schedule",
            "roadmap_30_days",
            "roadmap_60_days",
            "roadmap_90_days",
        ],
        Text,
    );

    for metric in ["ontime", "latency", "variance", "change"] {
        fields.push(FieldSpec::new(format!("baseline_{}", metric), Float));
        fields.push(FieldSpec::new(format!("target_{}", metric), Float));
        fields.push(FieldSpec::new(format!("owner_{}", metric), Text));
    }

    add(&mut fields, &["next_steps"], Text);

    fields
}

/// camelCase spellings that generic conversion gets wrong (digit groups)
fn alias(key: &str) -> Option<String> {
    if let Some(rest) = key.strip_prefix("sensitivity") {
        let digits: String = rest.chars().take_while(|c| c.is_ascii_digit()).collect();
        if !digits.is_empty() {
            return Some(format!(
                "sensitivity_{}_{}",
                digits,
                to_snake_case(&rest[digits.len()..])
            ));
        }
    }

    if let Some(rest) = key.strip_prefix("roadmap") {
        if let Some(days) = rest.strip_suffix("Days") {
            return Some(format!("roadmap_{}_days", days));
        }
    }

    if let Some(prefix) = key.strip_suffix("5yr") {
        if !prefix.is_empty() && !prefix.ends_with('_') {
            return Some(format!("{}_5yr", to_snake_case(prefix)));
        }
    }

    None
}

/// Generic camelCase to snake_case; an underscore goes before each uppercase
/// letter, digits stay attached to what precedes them.
pub fn to_snake_case(key: &str) -> String {
    let mut out = String::with_capacity(key.len() + 4);
    for (i, ch) in key.chars().enumerate() {
        if ch.is_ascii_uppercase() {
            if i > 0 && !out.ends_with('_') {
                out.push('_');
            }
            out.push(ch.to_ascii_lowercase());
        } else {
            out.push(ch);
        }
    }
    out
}

pub fn normalize_key(key: &str) -> String {
    alias(key).unwrap_or_else(|| to_snake_case(key))
}

/// Result of normalizing an incoming field mapping
#[derive(Debug, Clone, Serialize)]
pub struct NormalizedFields {
    pub fields: Map<String, Value>,
    /// Schema fields that were absent and received their default
    pub missing: Vec<String>,
    pub type_errors: Vec<String>,
}

/// Convert camelCase keys to snake_case and fill every absent schema field
/// with its default. Keys outside the schema are kept as-is (after
/// conversion).
pub fn normalize(payload: Map<String, Value>) -> NormalizedFields {
    let mut fields: Map<String, Value> = payload
        .into_iter()
        .map(|(key, value)| (normalize_key(&key), value))
        .collect();

    let mut missing = Vec::new();
    for spec in schema() {
        if !fields.contains_key(&spec.name) {
            fields.insert(spec.name.clone(), spec.default);
            missing.push(spec.name);
        }
    }

    if !missing.is_empty() {
        tracing::warn!(count = missing.len(), "Missing template fields filled with defaults");
    }

    let type_errors = validate(&fields);
    tracing::info!(fields = fields.len(), "Normalized fields for template rendering");

    NormalizedFields {
        fields,
        missing,
        type_errors,
    }
}

/// Describe every present field whose value does not match its kind.
pub fn validate(fields: &Map<String, Value>) -> Vec<String> {
    schema()
        .into_iter()
        .filter_map(|spec| {
            let value = fields.get(&spec.name)?;
            if spec.kind.accepts(value) {
                None
            } else {
                Some(format!(
                    "{}: expected {}, got {}",
                    spec.name,
                    spec.kind.name(),
                    json_type(value)
                ))
            }
        })
        .collect()
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(n) if n.is_f64() => "float",
        Value::Number(_) => "integer",
        Value::String(_) => "text",
        Value::Array(_) => "list",
        Value::Object(_) => "object",
    }
}
