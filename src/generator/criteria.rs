use chrono::{Local, NaiveDate};

/// The operator family shared by number, date, and text validation rules.
///
/// `validationType` arrives as a literal token (`">="`, `"[num]"`,
/// `"[=dates]"`, ...). It is parsed once here so the generator can dispatch
/// on a typed operator instead of re-inspecting strings in every branch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CriteriaOp {
    GreaterOrEqual,
    LessOrEqual,
    Greater,
    Less,
    /// `[x]` — both bounds included.
    InclusiveRange,
    /// `(x)` — both bounds excluded.
    ExclusiveRange,
    /// `[=x]` — each criteria token is a candidate value, echoed verbatim.
    LiteralList,
    /// `[=xs]` — the criteria tokens form one combined candidate.
    CombinedLiterals,
    /// No recognized operator; bounds default.
    Unspecified,
}

impl CriteriaOp {
    pub fn from_tag(tag: &str) -> Self {
        match tag.trim() {
            ">=" => CriteriaOp::GreaterOrEqual,
            "<=" => CriteriaOp::LessOrEqual,
            ">" => CriteriaOp::Greater,
            "<" => CriteriaOp::Less,
            tag if tag.starts_with("[=") => {
                // Plural tags ("[=nums]", "[=dates]", "[=texts]") combine.
                if tag.trim_end_matches(']').ends_with('s') {
                    CriteriaOp::CombinedLiterals
                } else {
                    CriteriaOp::LiteralList
                }
            }
            tag if tag.starts_with('(') => CriteriaOp::ExclusiveRange,
            tag if tag.starts_with('[') => CriteriaOp::InclusiveRange,
            _ => CriteriaOp::Unspecified,
        }
    }
}

/// A field's validation rule, parsed from `validationType` +
/// `validationCriteria` at the schema boundary.
#[derive(Debug, Clone)]
pub struct ValidationRule {
    pub op: CriteriaOp,
    /// Comma-split, trimmed, non-empty criteria tokens.
    pub tokens: Vec<String>,
}

impl ValidationRule {
    pub fn parse(validation_type: Option<&str>, criteria: Option<&str>) -> Self {
        let op = validation_type
            .map(CriteriaOp::from_tag)
            .unwrap_or(CriteriaOp::Unspecified);
        let tokens = criteria
            .unwrap_or("")
            .split(',')
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .map(str::to_string)
            .collect();
        Self { op, tokens }
    }

    /// Tokens that parse as numbers, in criteria order.
    pub fn numeric_tokens(&self) -> Vec<f64> {
        self.tokens
            .iter()
            .filter_map(|token| token.parse::<f64>().ok())
            .collect()
    }

    /// Tokens that parse as ISO dates, with `"today"` resolving to the
    /// current local date.
    pub fn date_tokens(&self) -> Vec<NaiveDate> {
        self.tokens.iter().filter_map(|t| parse_date(t)).collect()
    }
}

/// Parse an ISO `yyyy-mm-dd` date or the `"today"` keyword.
pub fn parse_date(token: &str) -> Option<NaiveDate> {
    if token.eq_ignore_ascii_case("today") {
        return Some(Local::now().date_naive());
    }
    NaiveDate::parse_from_str(token, "%Y-%m-%d").ok()
}
