use std::fmt::{Display, Formatter};

use anyhow::Result;
use launch_advisor_core::{
    evaluate_with_variant, rule_infos, Conclusion, LaunchSnapshot, MainEngineStatus, RuleInfo,
    RuleSetVariant, Severity, SubsystemStatus, TraceEntry, WeatherState,
};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use time::OffsetDateTime;
use ulid::Ulid;

pub const API_CONTRACT_VERSION: &str = "api.v1";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct EvaluationId(pub Ulid);

impl EvaluationId {
    #[must_use]
    pub fn new() -> Self {
        Self(Ulid::new())
    }
}

impl Default for EvaluationId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for EvaluationId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The eleven snapshot fields in canonical form, plus evaluation options.
/// Caller-side labels are mapped into these values before they reach the API.
#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
pub struct EvaluateRequest {
    pub fuel_level: u8,
    pub main_engine: MainEngineStatus,
    pub tank_pressure: SubsystemStatus,
    pub navigation: SubsystemStatus,
    pub communication: SubsystemStatus,
    pub electrical: SubsystemStatus,
    pub control_software: SubsystemStatus,
    pub precipitation_probability: u8,
    pub weather: WeatherState,
    pub sensors: SubsystemStatus,
    pub aerodynamics: SubsystemStatus,
    #[serde(default)]
    pub ruleset: Option<RuleSetVariant>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub as_of: Option<OffsetDateTime>,
}

impl EvaluateRequest {
    #[must_use]
    pub fn snapshot(&self) -> LaunchSnapshot {
        LaunchSnapshot {
            fuel_level: self.fuel_level,
            main_engine: self.main_engine,
            tank_pressure: self.tank_pressure,
            navigation: self.navigation,
            communication: self.communication,
            electrical: self.electrical,
            control_software: self.control_software,
            precipitation_probability: self.precipitation_probability,
            weather: self.weather,
            sensors: self.sensors,
            aerodynamics: self.aerodynamics,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Eq, PartialEq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Disposition {
    Go,
    Hold,
    NoGo,
}

impl Disposition {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Go => "go",
            Self::Hold => "hold",
            Self::NoGo => "no_go",
        }
    }
}

/// The full evaluation envelope handed to callers: the engine outputs plus
/// identity and audit metadata.
#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
pub struct EvaluationReport {
    pub report_id: String,
    pub evaluation_id: EvaluationId,
    #[serde(with = "time::serde::rfc3339")]
    pub evaluated_at: OffsetDateTime,
    pub ruleset_version: String,
    pub disposition: Disposition,
    pub summary: String,
    pub conclusions: Vec<Conclusion>,
    pub trace: Vec<TraceEntry>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct LaunchAdvisorApi {
    default_variant: RuleSetVariant,
}

impl LaunchAdvisorApi {
    #[must_use]
    pub fn new(default_variant: RuleSetVariant) -> Self {
        Self { default_variant }
    }

    /// Run one evaluation over a fresh engine instance.
    ///
    /// # Errors
    /// Returns an error when the snapshot violates a field domain.
    pub fn evaluate(&self, request: EvaluateRequest) -> Result<EvaluationReport> {
        let variant = request.ruleset.unwrap_or(self.default_variant);
        let evaluated_at = request.as_of.unwrap_or_else(OffsetDateTime::now_utc);
        let snapshot = request.snapshot();

        let result = evaluate_with_variant(snapshot, variant)?;
        let disposition = derive_disposition(&result.conclusions);

        Ok(EvaluationReport {
            report_id: compute_report_id(&snapshot, variant),
            evaluation_id: EvaluationId::new(),
            evaluated_at,
            ruleset_version: variant.version().to_string(),
            disposition,
            summary: result.summary,
            conclusions: result.conclusions,
            trace: result.trace,
        })
    }

    /// Catalog metadata for the variant this API instance defaults to.
    #[must_use]
    pub fn ruleset(&self) -> Vec<RuleInfo> {
        rule_infos(self.default_variant)
    }

    #[must_use]
    pub fn default_variant(&self) -> RuleSetVariant {
        self.default_variant
    }
}

fn derive_disposition(conclusions: &[Conclusion]) -> Disposition {
    if conclusions.iter().any(|conclusion| conclusion.severity == Severity::Critical) {
        Disposition::NoGo
    } else if conclusions.iter().any(|conclusion| conclusion.severity == Severity::Delay) {
        Disposition::Hold
    } else {
        Disposition::Go
    }
}

/// Deterministic fingerprint of the snapshot + variant, so identical inputs
/// yield identical report ids across processes.
fn compute_report_id(snapshot: &LaunchSnapshot, variant: RuleSetVariant) -> String {
    let mut hasher = Sha256::new();
    hasher.update(variant.as_str().as_bytes());
    hasher.update([snapshot.fuel_level, snapshot.precipitation_probability]);
    for part in [
        snapshot.main_engine.as_str(),
        snapshot.tank_pressure.as_str(),
        snapshot.navigation.as_str(),
        snapshot.communication.as_str(),
        snapshot.electrical.as_str(),
        snapshot.control_software.as_str(),
        snapshot.weather.as_str(),
        snapshot.sensors.as_str(),
        snapshot.aerodynamics.as_str(),
    ] {
        hasher.update(part.as_bytes());
    }

    let digest = hasher.finalize();
    let digest_hex = format!("{digest:x}");
    format!("eval_{}", &digest_hex[..16])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nominal_request() -> EvaluateRequest {
        EvaluateRequest {
            fuel_level: 100,
            main_engine: MainEngineStatus::Nominal,
            tank_pressure: SubsystemStatus::Ok,
            navigation: SubsystemStatus::Ok,
            communication: SubsystemStatus::Ok,
            electrical: SubsystemStatus::Ok,
            control_software: SubsystemStatus::Ok,
            precipitation_probability: 0,
            weather: WeatherState::Clear,
            sensors: SubsystemStatus::Ok,
            aerodynamics: SubsystemStatus::Ok,
            ruleset: None,
            as_of: None,
        }
    }

    fn evaluate_or_panic(api: &LaunchAdvisorApi, request: EvaluateRequest) -> EvaluationReport {
        match api.evaluate(request) {
            Ok(report) => report,
            Err(err) => panic!("evaluation should succeed: {err}"),
        }
    }

    // Test IDs: TAPI-001
    #[test]
    fn nominal_request_reports_go() {
        let api = LaunchAdvisorApi::default();
        let report = evaluate_or_panic(&api, nominal_request());

        assert_eq!(report.disposition, Disposition::Go);
        assert_eq!(report.ruleset_version, "ruleset.extended.v1");
        assert_eq!(report.summary, "INFO: All systems nominal, ready for launch");
        assert_eq!(report.trace.len(), 1);
    }

    // Test IDs: TAPI-002
    #[test]
    fn critical_findings_report_no_go() {
        let api = LaunchAdvisorApi::default();
        let mut request = nominal_request();
        request.fuel_level = 50;

        let report = evaluate_or_panic(&api, request);
        assert_eq!(report.disposition, Disposition::NoGo);
        assert!(report.summary.contains("CRITICAL: Insufficient fuel"));
    }

    // Test IDs: TAPI-003
    #[test]
    fn fuel_reserve_advisory_reports_hold() {
        let api = LaunchAdvisorApi::default();
        let mut request = nominal_request();
        request.fuel_level = 98;

        let report = evaluate_or_panic(&api, request);
        assert_eq!(report.disposition, Disposition::Hold);
    }

    // Test IDs: TAPI-004
    #[test]
    fn report_id_is_deterministic_per_snapshot_and_variant() {
        let api = LaunchAdvisorApi::default();

        let first = evaluate_or_panic(&api, nominal_request());
        let second = evaluate_or_panic(&api, nominal_request());
        assert_eq!(first.report_id, second.report_id);
        assert!(first.report_id.starts_with("eval_"));
        assert_ne!(first.evaluation_id, second.evaluation_id);

        let mut baseline_request = nominal_request();
        baseline_request.ruleset = Some(RuleSetVariant::Baseline);
        let baseline = evaluate_or_panic(&api, baseline_request);
        assert_ne!(first.report_id, baseline.report_id);
        assert_eq!(baseline.ruleset_version, "ruleset.baseline.v1");
    }

    // Test IDs: TAPI-005
    #[test]
    fn invalid_snapshot_surfaces_as_error() {
        let api = LaunchAdvisorApi::default();
        let mut request = nominal_request();
        request.precipitation_probability = 200;

        let err = match api.evaluate(request) {
            Ok(report) => panic!("expected error, got disposition {:?}", report.disposition),
            Err(err) => err,
        };
        assert!(err.to_string().contains("precipitation_probability"));
    }

    // Test IDs: TAPI-006
    #[test]
    fn report_round_trips_through_json() {
        let api = LaunchAdvisorApi::default();
        let mut request = nominal_request();
        request.fuel_level = 93;
        request.as_of = Some(OffsetDateTime::UNIX_EPOCH);

        let report = evaluate_or_panic(&api, request);
        let json = match serde_json::to_string(&report) {
            Ok(value) => value,
            Err(err) => panic!("report should serialize: {err}"),
        };
        let decoded: EvaluationReport = match serde_json::from_str(&json) {
            Ok(value) => value,
            Err(err) => panic!("report should deserialize: {err}"),
        };
        assert_eq!(decoded, report);
    }

    // Test IDs: TAPI-007
    #[test]
    fn ruleset_listing_follows_default_variant() {
        let extended = LaunchAdvisorApi::new(RuleSetVariant::Extended);
        assert_eq!(extended.ruleset().len(), 17);

        let baseline = LaunchAdvisorApi::new(RuleSetVariant::Baseline);
        assert_eq!(baseline.ruleset().len(), 14);
    }
}
