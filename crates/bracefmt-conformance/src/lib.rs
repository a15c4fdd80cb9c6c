//! Conformance fixtures and reporting for the bracefmt engine.
//!
//! Provides:
//! - [`FixtureCase`] / [`FixtureSet`]: serializable end-to-end scenarios
//!   (template + arguments + expected output).
//! - [`builtin_fixture_set`]: the canonical scenario table.
//! - [`run_fixture_set`]: drives every case through the engine and collects
//!   a structured [`RunReport`].
//! - [`render_report_markdown`]: human-readable report rendering.

use serde::{Deserialize, Serialize};

use bracefmt_core::{format_slice, ArgValue};

/// One argument in a fixture case, in a serialization-friendly form.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FixtureArg {
    I32(i32),
    U32(u32),
    I64(i64),
    U64(u64),
    Usize(usize),
    F64(f64),
    Str(String),
}

impl FixtureArg {
    fn as_value(&self) -> ArgValue<'_> {
        match self {
            FixtureArg::I32(v) => ArgValue::Int32(*v),
            FixtureArg::U32(v) => ArgValue::Uint32(*v),
            FixtureArg::I64(v) => ArgValue::Int64(*v),
            FixtureArg::U64(v) => ArgValue::Uint64(*v),
            FixtureArg::Usize(v) => ArgValue::Size(*v),
            FixtureArg::F64(v) => ArgValue::Double(*v),
            FixtureArg::Str(v) => ArgValue::Str(v.as_bytes()),
        }
    }
}

/// A single conformance case.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixtureCase {
    /// Case identifier.
    pub name: String,
    /// Template handed to the engine.
    pub template: String,
    /// Arguments, in cursor order.
    pub args: Vec<FixtureArg>,
    /// Expected output bytes.
    pub expected: String,
}

/// A collection of conformance cases.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixtureSet {
    /// Schema version.
    pub version: String,
    /// Scenario family name.
    pub family: String,
    /// Individual cases.
    pub cases: Vec<FixtureCase>,
}

impl FixtureSet {
    /// Load a fixture set from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Serialize the fixture set to pretty JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Outcome of one fixture case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Pass,
    Fail,
}

/// Result record for one case.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseResult {
    pub name: String,
    pub outcome: Outcome,
    pub expected: String,
    pub actual: String,
}

/// Aggregated results for a fixture run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub family: String,
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub results: Vec<CaseResult>,
}

impl RunReport {
    /// Whether every case passed.
    #[must_use]
    pub fn all_passed(&self) -> bool {
        self.failed == 0
    }

    /// Serialize the report to pretty JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Run one case through the engine.
#[must_use]
pub fn run_case(case: &FixtureCase) -> CaseResult {
    let values: Vec<ArgValue<'_>> = case.args.iter().map(FixtureArg::as_value).collect();
    let mut out = [0u8; 4096];
    let n = format_slice(case.template.as_bytes(), &mut out, &values);
    let actual = String::from_utf8_lossy(&out[..n]).into_owned();
    let outcome = if actual == case.expected {
        Outcome::Pass
    } else {
        Outcome::Fail
    };
    CaseResult {
        name: case.name.clone(),
        outcome,
        expected: case.expected.clone(),
        actual,
    }
}

/// Run every case in a fixture set.
#[must_use]
pub fn run_fixture_set(set: &FixtureSet) -> RunReport {
    let results: Vec<CaseResult> = set.cases.iter().map(run_case).collect();
    let passed = results
        .iter()
        .filter(|r| r.outcome == Outcome::Pass)
        .count();
    RunReport {
        family: set.family.clone(),
        total: results.len(),
        passed,
        failed: results.len() - passed,
        results,
    }
}

/// Render a run report as markdown.
#[must_use]
pub fn render_report_markdown(report: &RunReport) -> String {
    let mut md = String::new();
    md.push_str(&format!("# Conformance: {}\n\n", report.family));
    md.push_str(&format!(
        "{} cases, {} passed, {} failed\n\n",
        report.total, report.passed, report.failed
    ));
    md.push_str("| case | outcome | expected | actual |\n");
    md.push_str("|---|---|---|---|\n");
    for result in &report.results {
        let outcome = match result.outcome {
            Outcome::Pass => "pass",
            Outcome::Fail => "FAIL",
        };
        md.push_str(&format!(
            "| {} | {} | `{}` | `{}` |\n",
            result.name, outcome, result.expected, result.actual
        ));
    }
    md
}

fn case(name: &str, template: &str, args: Vec<FixtureArg>, expected: &str) -> FixtureCase {
    FixtureCase {
        name: name.to_string(),
        template: template.to_string(),
        args,
        expected: expected.to_string(),
    }
}

/// The canonical end-to-end scenario table.
#[must_use]
pub fn builtin_fixture_set() -> FixtureSet {
    use FixtureArg::{F64, I32, Str, U32, U64};
    FixtureSet {
        version: "1".to_string(),
        family: "bracefmt-e2e".to_string(),
        cases: vec![
            case("literal", "Hello, world!", vec![], "Hello, world!"),
            case(
                "string",
                "{:s}",
                vec![Str("Hello, world!".into())],
                "Hello, world!",
            ),
            case("decimal", "{:d}", vec![I32(42)], "42"),
            case("hex", "{:x}", vec![I32(42)], "2a"),
            case("hex_alt", "{:#x}", vec![I32(42)], "0x2a"),
            case("hex_upper_flag", "{:!x}", vec![I32(42)], "2A"),
            case("zero_pad", "{:03d}", vec![I32(7)], "007"),
            case("zero_pad_negative", "{:04d}", vec![I32(-7)], "-007"),
            case("zero_pad_signed", "{:+04d}", vec![I32(7)], "+007"),
            case("space_flag", "{: d}", vec![I32(42)], " 42"),
            case("space_flag_negative", "{: d}", vec![I32(-42)], "-42"),
            case("float_precision", "{:.2f}", vec![F64(3.14)], "3.14"),
            case("width_left_default", "{:4d}", vec![I32(42)], "42  "),
            case("width_center", "{:^4d}", vec![I32(42)], " 42 "),
            case("width_right", "{:>4d}", vec![I32(42)], "  42"),
            case(
                "fill_centered_string",
                "{:$=^17s}",
                vec![Str(" hello ".into())],
                "===== hello =====",
            ),
            case(
                "runtime_width",
                "{:$.>*b}",
                vec![U32(5), I32(15)],
                "............101",
            ),
            case(
                "runtime_width_indexed",
                "{1:$.<*0b}",
                vec![I32(15), U32(5)],
                "101............",
            ),
            case(
                "reorder_pair",
                "{1:d}, {0:.2f}",
                vec![F64(3.14), I32(42)],
                "42, 3.14",
            ),
            case(
                "reorder_triple",
                "{0:.2f}, {2:s}, {1:d}",
                vec![F64(3.14), I32(42), Str("string".into())],
                "3.14, string, 42",
            ),
            case("float_alt_whole", "{:#.1f}", vec![F64(3.0)], "3"),
            case("float_alt_fraction", "{:#.1f}", vec![F64(3.1)], "3.1"),
            case("zero_arg_fill", "{:10}", vec![], "          "),
            case("brace_escapes", "{{}}", vec![], "{}"),
            case("bad_type", "{:q}", vec![I32(42)], "{bad type: q}"),
            case("printf_decimal", "%d", vec![I32(42)], "42"),
            case("printf_hex", "%x", vec![I32(42)], "2a"),
            case("printf_float", "%.2f", vec![F64(3.14)], "3.14"),
            case(
                "printf_wide_hex",
                "%llX",
                vec![U64(u64::MAX)],
                "FFFFFFFFFFFFFFFF",
            ),
            case(
                "printf_mixed",
                "%d, %s, %x",
                vec![I32(1), Str("hi".into()), I32(15)],
                "1, hi, f",
            ),
            case("printf_unknown", "-> %J <-", vec![I32(1)], "->  <-"),
            case("printf_escape", "100%%", vec![], "100%"),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_set_all_pass() {
        let report = run_fixture_set(&builtin_fixture_set());
        let failures: Vec<_> = report
            .results
            .iter()
            .filter(|r| r.outcome == Outcome::Fail)
            .collect();
        assert!(report.all_passed(), "failures: {failures:#?}");
    }

    #[test]
    fn test_fixture_set_round_trips_through_json() {
        let set = builtin_fixture_set();
        let json = set.to_json().expect("serialize");
        let back = FixtureSet::from_json(&json).expect("deserialize");
        assert_eq!(back.cases.len(), set.cases.len());
        assert_eq!(back.family, set.family);
    }

    #[test]
    fn test_report_counts_failures() {
        let set = FixtureSet {
            version: "1".to_string(),
            family: "bad".to_string(),
            cases: vec![case("wrong", "{:d}", vec![FixtureArg::I32(1)], "2")],
        };
        let report = run_fixture_set(&set);
        assert_eq!(report.failed, 1);
        assert!(!report.all_passed());
        let md = render_report_markdown(&report);
        assert!(md.contains("FAIL"));
    }
}
