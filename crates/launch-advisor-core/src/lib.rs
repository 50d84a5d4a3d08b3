use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, thiserror::Error, Eq, PartialEq)]
pub enum EngineError {
    #[error("invalid snapshot: {0}")]
    InvalidSnapshot(String),
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Eq, PartialEq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum MainEngineStatus {
    Nominal,
    Anomaly,
}

impl MainEngineStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Nominal => "nominal",
            Self::Anomaly => "anomaly",
        }
    }

    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "nominal" => Some(Self::Nominal),
            "anomaly" => Some(Self::Anomaly),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Eq, PartialEq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum SubsystemStatus {
    Ok,
    Fail,
}

impl SubsystemStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ok => "ok",
            Self::Fail => "fail",
        }
    }

    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "ok" => Some(Self::Ok),
            "fail" => Some(Self::Fail),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Eq, PartialEq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum WeatherState {
    Clear,
    Overcast,
}

impl WeatherState {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Clear => "clear",
            Self::Overcast => "overcast",
        }
    }

    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "clear" => Some(Self::Clear),
            "overcast" => Some(Self::Overcast),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Eq, PartialEq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Critical,
    Delay,
    Info,
}

impl Severity {
    /// Uppercase tag used when composing summary lines.
    #[must_use]
    pub fn tag(self) -> &'static str {
        match self {
            Self::Critical => "CRITICAL",
            Self::Delay => "DELAY",
            Self::Info => "INFO",
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Critical => "critical",
            Self::Delay => "delay",
            Self::Info => "info",
        }
    }

    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "critical" => Some(Self::Critical),
            "delay" => Some(Self::Delay),
            "info" => Some(Self::Info),
            _ => None,
        }
    }
}

/// One immutable pre-launch telemetry snapshot. Percent fields are validated
/// into 0..=100 before any rule runs.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Eq, PartialEq, Hash)]
pub struct LaunchSnapshot {
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
}

impl LaunchSnapshot {
    /// Check every field against its declared domain.
    ///
    /// # Errors
    /// Returns [`EngineError::InvalidSnapshot`] when a percent field falls
    /// outside 0..=100.
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.fuel_level > 100 {
            return Err(EngineError::InvalidSnapshot(format!(
                "fuel_level MUST be within 0..=100, got {}",
                self.fuel_level
            )));
        }

        if self.precipitation_probability > 100 {
            return Err(EngineError::InvalidSnapshot(format!(
                "precipitation_probability MUST be within 0..=100, got {}",
                self.precipitation_probability
            )));
        }

        Ok(())
    }
}

/// A derived fact asserted by a fired rule.
#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
pub struct Conclusion {
    pub severity: Severity,
    pub detail: String,
}

impl Conclusion {
    fn critical(detail: &str) -> Self {
        Self { severity: Severity::Critical, detail: detail.to_string() }
    }

    fn delay(detail: &str) -> Self {
        Self { severity: Severity::Delay, detail: detail.to_string() }
    }

    fn info(detail: &str) -> Self {
        Self { severity: Severity::Info, detail: detail.to_string() }
    }
}

/// One explanation record, appended each time a rule fires.
#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
pub struct TraceEntry {
    pub rule: String,
    pub trigger: String,
    pub justification: String,
}

/// Working memory for a single evaluation: the installed snapshot plus every
/// conclusion asserted so far, in assertion order.
#[derive(Debug, Clone, Default)]
pub struct FactStore {
    snapshot: Option<LaunchSnapshot>,
    conclusions: Vec<Conclusion>,
}

impl FactStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        self.snapshot = None;
        self.conclusions.clear();
    }

    /// Install the snapshot fact for the current evaluation.
    ///
    /// # Errors
    /// Returns [`EngineError::InvalidSnapshot`] when any field is outside its
    /// declared domain; working memory is left without a snapshot.
    pub fn set_snapshot(&mut self, snapshot: LaunchSnapshot) -> Result<(), EngineError> {
        snapshot.validate()?;
        self.snapshot = Some(snapshot);
        Ok(())
    }

    #[must_use]
    pub fn snapshot(&self) -> Option<&LaunchSnapshot> {
        self.snapshot.as_ref()
    }

    pub fn add_conclusion(&mut self, conclusion: Conclusion) {
        self.conclusions.push(conclusion);
    }

    #[must_use]
    pub fn conclusions(&self) -> &[Conclusion] {
        &self.conclusions
    }

    #[must_use]
    pub fn has_conclusion_tagged(&self, severity: Severity) -> bool {
        self.conclusions.iter().any(|conclusion| conclusion.severity == severity)
    }

    #[must_use]
    pub fn has_any_conclusion(&self) -> bool {
        !self.conclusions.is_empty()
    }
}

/// Append-only explanation log for one evaluation.
#[derive(Debug, Clone, Default)]
pub struct TraceRecorder {
    entries: Vec<TraceEntry>,
}

impl TraceRecorder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, rule: &str, trigger: String, justification: &str) {
        self.entries.push(TraceEntry {
            rule: rule.to_string(),
            trigger,
            justification: justification.to_string(),
        });
    }

    #[must_use]
    pub fn entries(&self) -> &[TraceEntry] {
        &self.entries
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

/// Everything a single firing contributes: one trace entry plus the
/// conclusions the rule asserts.
struct Firing {
    trigger: String,
    justification: &'static str,
    conclusions: Vec<Conclusion>,
}

/// One immutable production rule. Conditions are pure functions of the
/// snapshot and the current conclusion set; negative conditions read the
/// conclusion set through [`FactStore`].
pub struct Rule {
    name: &'static str,
    priority: i8,
    condition: fn(&LaunchSnapshot, &FactStore) -> bool,
    fire: fn(&LaunchSnapshot) -> Firing,
}

impl Rule {
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    #[must_use]
    pub fn priority(&self) -> i8 {
        self.priority
    }
}

/// Rule metadata exposed to callers that render the catalog.
#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
pub struct RuleInfo {
    pub name: String,
    pub priority: i8,
}

/// The two observed rule-catalog generations. `Extended` is canonical;
/// `Baseline` predates the lightning, support-degradation, and aerodynamics
/// refinements and is kept for regression parity.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, Eq, PartialEq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum RuleSetVariant {
    #[default]
    Extended,
    Baseline,
}

impl RuleSetVariant {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Extended => "extended",
            Self::Baseline => "baseline",
        }
    }

    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "extended" => Some(Self::Extended),
            "baseline" => Some(Self::Baseline),
            _ => None,
        }
    }

    #[must_use]
    pub fn version(self) -> &'static str {
        match self {
            Self::Extended => "ruleset.extended.v1",
            Self::Baseline => "ruleset.baseline.v1",
        }
    }
}

fn subsystem_failures(snapshot: &LaunchSnapshot, include_aerodynamics: bool) -> bool {
    let core_failed = [
        snapshot.tank_pressure,
        snapshot.navigation,
        snapshot.communication,
        snapshot.electrical,
        snapshot.control_software,
        snapshot.sensors,
    ]
    .iter()
    .any(|status| *status == SubsystemStatus::Fail);

    core_failed || (include_aerodynamics && snapshot.aerodynamics == SubsystemStatus::Fail)
}

/// The aggregator disjunction. Deliberately re-covers every individual
/// critical trigger so the trace always carries one canonical abort verdict.
fn should_abort(snapshot: &LaunchSnapshot, include_aerodynamics: bool) -> bool {
    snapshot.fuel_level <= 95
        || snapshot.main_engine == MainEngineStatus::Anomaly
        || subsystem_failures(snapshot, include_aerodynamics)
        || snapshot.precipitation_probability >= 60
        || (snapshot.precipitation_probability >= 30
            && snapshot.weather == WeatherState::Overcast)
        || (snapshot.communication == SubsystemStatus::Fail
            && snapshot.sensors == SubsystemStatus::Fail)
}

fn low_fuel_rule() -> Rule {
    Rule {
        name: "low_fuel",
        priority: 10,
        condition: |snapshot, _| snapshot.fuel_level <= 95,
        fire: |snapshot| Firing {
            trigger: format!("fuel_level = {}", snapshot.fuel_level),
            justification: "Insufficient fuel",
            conclusions: vec![Conclusion::critical("Insufficient fuel")],
        },
    }
}

fn fuel_reserve_alert_rule() -> Rule {
    Rule {
        name: "fuel_reserve_alert",
        priority: 5,
        // Guarded by absence of any critical conclusion: a critical finding
        // elsewhere suppresses the advisory delay.
        condition: |snapshot, facts| {
            snapshot.fuel_level > 95
                && snapshot.fuel_level <= 99
                && !facts.has_conclusion_tagged(Severity::Critical)
        },
        fire: |snapshot| Firing {
            trigger: format!("fuel_level = {}", snapshot.fuel_level),
            justification: "A two-hour launch delay is recommended",
            conclusions: vec![Conclusion::delay(
                "Two-hour delay, safety refueling in progress",
            )],
        },
    }
}

fn main_engine_failure_rule() -> Rule {
    Rule {
        name: "main_engine_failure",
        priority: 10,
        condition: |snapshot, _| snapshot.main_engine == MainEngineStatus::Anomaly,
        fire: |_| Firing {
            trigger: "main_engine = anomaly".to_string(),
            justification: "Main engine failure",
            conclusions: vec![Conclusion::critical("Main engine failure")],
        },
    }
}

fn tank_pressure_failure_rule() -> Rule {
    Rule {
        name: "tank_pressure_failure",
        priority: 10,
        condition: |snapshot, _| snapshot.tank_pressure == SubsystemStatus::Fail,
        fire: |_| Firing {
            trigger: "tank_pressure = fail".to_string(),
            justification: "Tank pressure out of range",
            conclusions: vec![Conclusion::critical("Tank pressure out of range")],
        },
    }
}

fn navigation_failure_rule() -> Rule {
    Rule {
        name: "navigation_failure",
        priority: 10,
        condition: |snapshot, _| snapshot.navigation == SubsystemStatus::Fail,
        fire: |_| Firing {
            trigger: "navigation = fail".to_string(),
            justification: "Navigation system failing",
            conclusions: vec![Conclusion::critical("Navigation system failing")],
        },
    }
}

fn communication_failure_rule() -> Rule {
    Rule {
        name: "communication_failure",
        priority: 10,
        condition: |snapshot, _| snapshot.communication == SubsystemStatus::Fail,
        fire: |_| Firing {
            trigger: "communication = fail".to_string(),
            justification: "Communication system not operational",
            conclusions: vec![Conclusion::critical("Communication system not operational")],
        },
    }
}

fn electrical_failure_rule() -> Rule {
    Rule {
        name: "electrical_failure",
        priority: 10,
        condition: |snapshot, _| snapshot.electrical == SubsystemStatus::Fail,
        fire: |_| Firing {
            trigger: "electrical = fail".to_string(),
            justification: "Electrical system failure",
            conclusions: vec![Conclusion::critical("Electrical system failure")],
        },
    }
}

fn control_software_failure_rule() -> Rule {
    Rule {
        name: "control_software_failure",
        priority: 10,
        condition: |snapshot, _| snapshot.control_software == SubsystemStatus::Fail,
        fire: |_| Firing {
            trigger: "control_software = fail".to_string(),
            justification: "Control software failure",
            conclusions: vec![Conclusion::critical("Control software failure")],
        },
    }
}

fn weather_risk_rule() -> Rule {
    Rule {
        name: "weather_risk",
        priority: 10,
        condition: |snapshot, _| {
            snapshot.precipitation_probability >= 30
                && snapshot.weather == WeatherState::Overcast
        },
        fire: |snapshot| Firing {
            trigger: format!(
                "precipitation_probability = {}",
                snapshot.precipitation_probability
            ),
            justification: "Elevated weather risk",
            conclusions: vec![Conclusion::critical("Elevated weather risk")],
        },
    }
}

fn sensor_failure_rule() -> Rule {
    Rule {
        name: "sensor_failure",
        priority: 10,
        condition: |snapshot, _| snapshot.sensors == SubsystemStatus::Fail,
        fire: |_| Firing {
            trigger: "sensors = fail".to_string(),
            justification: "Sensor system failure",
            conclusions: vec![Conclusion::critical("Sensor system failure")],
        },
    }
}

fn combined_electronics_failure_rule() -> Rule {
    Rule {
        name: "combined_electronics_failure",
        priority: 10,
        condition: |snapshot, _| {
            snapshot.navigation == SubsystemStatus::Fail
                && snapshot.communication == SubsystemStatus::Fail
                && snapshot.electrical == SubsystemStatus::Fail
                && snapshot.sensors == SubsystemStatus::Fail
        },
        fire: |_| Firing {
            trigger: "navigation = fail, communication = fail, electrical = fail, sensors = fail"
                .to_string(),
            justification: "Critical failure across electronic systems",
            conclusions: vec![Conclusion::critical(
                "Multiple electronic systems failing: launch cancellation likely",
            )],
        },
    }
}

fn combustion_failure_rule() -> Rule {
    Rule {
        name: "combustion_failure",
        priority: 10,
        condition: |snapshot, _| {
            snapshot.main_engine == MainEngineStatus::Anomaly
                && snapshot.tank_pressure == SubsystemStatus::Fail
        },
        fire: |_| Firing {
            trigger: "main_engine = anomaly, tank_pressure = fail".to_string(),
            justification: "Critical combustion problem detected",
            conclusions: vec![Conclusion::critical(
                "Combustion failure: main engine and tank pressure affected",
            )],
        },
    }
}

fn aerodynamics_failure_rule() -> Rule {
    Rule {
        name: "aerodynamics_failure",
        priority: 10,
        condition: |snapshot, _| snapshot.aerodynamics == SubsystemStatus::Fail,
        fire: |_| Firing {
            trigger: "aerodynamics = fail".to_string(),
            justification: "Critical problem in aerodynamic surfaces",
            conclusions: vec![Conclusion::critical(
                "Aerodynamics failure, launch cancellation likely",
            )],
        },
    }
}

fn lightning_storm_risk_rule() -> Rule {
    Rule {
        name: "lightning_storm_risk",
        priority: 15,
        condition: |snapshot, _| {
            snapshot.precipitation_probability >= 40
                && snapshot.electrical == SubsystemStatus::Fail
        },
        fire: |snapshot| Firing {
            trigger: format!(
                "precipitation_probability = {}% + electrical failure",
                snapshot.precipitation_probability
            ),
            justification: "Extreme risk of lightning strike and total power loss",
            conclusions: vec![Conclusion::critical(
                "Lightning storm hazard, vehicle integrity at risk",
            )],
        },
    }
}

fn support_systems_degradation_rule() -> Rule {
    Rule {
        name: "support_systems_degradation",
        priority: 12,
        condition: |snapshot, _| {
            snapshot.communication == SubsystemStatus::Fail
                && snapshot.control_software == SubsystemStatus::Fail
        },
        fire: |_| Firing {
            trigger: "communication = fail, control_software = fail".to_string(),
            justification: "Critical degradation of response capability",
            conclusions: vec![Conclusion::critical(
                "General degradation, multiple support system failures detected",
            )],
        },
    }
}

fn abort_review_rule(variant: RuleSetVariant) -> Rule {
    let condition: fn(&LaunchSnapshot, &FactStore) -> bool = match variant {
        RuleSetVariant::Extended => |snapshot, _| should_abort(snapshot, true),
        RuleSetVariant::Baseline => |snapshot, _| should_abort(snapshot, false),
    };

    Rule {
        name: "abort_review",
        priority: 0,
        condition,
        fire: |_| Firing {
            trigger: "critical launch state detected".to_string(),
            justification: "Abort recommended by the advisory system",
            conclusions: vec![Conclusion::critical(
                "Abort recommended by the advisory system",
            )],
        },
    }
}

fn all_clear_rule() -> Rule {
    Rule {
        name: "all_clear",
        priority: 0,
        // The terminal rule: its only condition is that nothing else has
        // concluded anything.
        condition: |_, facts| !facts.has_any_conclusion(),
        fire: |_| Firing {
            trigger: "no critical findings".to_string(),
            justification: "All systems nominal, ready for launch",
            conclusions: vec![Conclusion::info("All systems nominal, ready for launch")],
        },
    }
}

/// The fixed, ordered rule catalog for one variant. Declaration order breaks
/// priority ties during conflict resolution.
#[must_use]
pub fn rule_catalog(variant: RuleSetVariant) -> Vec<Rule> {
    match variant {
        RuleSetVariant::Extended => vec![
            low_fuel_rule(),
            fuel_reserve_alert_rule(),
            main_engine_failure_rule(),
            tank_pressure_failure_rule(),
            navigation_failure_rule(),
            communication_failure_rule(),
            electrical_failure_rule(),
            control_software_failure_rule(),
            weather_risk_rule(),
            sensor_failure_rule(),
            combined_electronics_failure_rule(),
            combustion_failure_rule(),
            aerodynamics_failure_rule(),
            lightning_storm_risk_rule(),
            support_systems_degradation_rule(),
            abort_review_rule(variant),
            all_clear_rule(),
        ],
        RuleSetVariant::Baseline => vec![
            low_fuel_rule(),
            fuel_reserve_alert_rule(),
            main_engine_failure_rule(),
            tank_pressure_failure_rule(),
            navigation_failure_rule(),
            communication_failure_rule(),
            electrical_failure_rule(),
            control_software_failure_rule(),
            weather_risk_rule(),
            sensor_failure_rule(),
            combined_electronics_failure_rule(),
            combustion_failure_rule(),
            abort_review_rule(variant),
            all_clear_rule(),
        ],
    }
}

/// Catalog metadata in declaration order, for callers that render it.
#[must_use]
pub fn rule_infos(variant: RuleSetVariant) -> Vec<RuleInfo> {
    rule_catalog(variant)
        .iter()
        .map(|rule| RuleInfo { name: rule.name.to_string(), priority: rule.priority })
        .collect()
}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum EnginePhase {
    Idle,
    Matching,
    Firing,
    Fixpoint,
}

/// Forward-chaining engine over one fact store and one trace recorder.
/// Refraction marks each rule after it fires, so one pass per rule bounds
/// the loop and fixpoint is guaranteed.
pub struct InferenceEngine {
    rules: Vec<Rule>,
    facts: FactStore,
    trace: TraceRecorder,
    fired: Vec<bool>,
    phase: EnginePhase,
}

impl InferenceEngine {
    #[must_use]
    pub fn new(variant: RuleSetVariant) -> Self {
        let rules = rule_catalog(variant);
        let fired = vec![false; rules.len()];
        Self {
            rules,
            facts: FactStore::new(),
            trace: TraceRecorder::new(),
            fired,
            phase: EnginePhase::Idle,
        }
    }

    #[must_use]
    pub fn phase(&self) -> EnginePhase {
        self.phase
    }

    #[must_use]
    pub fn facts(&self) -> &FactStore {
        &self.facts
    }

    #[must_use]
    pub fn trace(&self) -> &[TraceEntry] {
        self.trace.entries()
    }

    /// Reset working memory and install the snapshot for a new evaluation.
    ///
    /// # Errors
    /// Returns [`EngineError::InvalidSnapshot`] when the snapshot violates a
    /// field domain; the engine stays in `Idle` and no rule runs.
    pub fn install_snapshot(&mut self, snapshot: LaunchSnapshot) -> Result<(), EngineError> {
        self.facts.reset();
        self.trace.clear();
        self.fired = vec![false; self.rules.len()];
        self.phase = EnginePhase::Idle;
        self.facts.set_snapshot(snapshot)?;
        self.phase = EnginePhase::Matching;
        Ok(())
    }

    /// Conflict resolution: the not-yet-fired rule with the highest priority
    /// whose condition currently holds; ties go to declaration order.
    fn next_eligible(&self, snapshot: &LaunchSnapshot) -> Option<usize> {
        let mut best: Option<usize> = None;
        for (index, rule) in self.rules.iter().enumerate() {
            if self.fired[index] || !(rule.condition)(snapshot, &self.facts) {
                continue;
            }
            match best {
                Some(current) if rule.priority <= self.rules[current].priority => {}
                _ => best = Some(index),
            }
        }
        best
    }

    /// Fire eligible rules until no rule's condition is newly satisfiable.
    /// The agenda is re-scanned after every firing because negative
    /// conditions can flip once new conclusions land.
    pub fn run_to_fixpoint(&mut self) {
        if self.phase != EnginePhase::Matching {
            return;
        }

        for _ in 0..self.rules.len() {
            let Some(snapshot) = self.facts.snapshot().copied() else {
                break;
            };
            let Some(index) = self.next_eligible(&snapshot) else {
                break;
            };

            self.phase = EnginePhase::Firing;
            let firing = (self.rules[index].fire)(&snapshot);
            self.trace.record(self.rules[index].name, firing.trigger, firing.justification);
            for conclusion in firing.conclusions {
                self.facts.add_conclusion(conclusion);
            }
            self.fired[index] = true;
            self.phase = EnginePhase::Matching;
        }

        self.phase = EnginePhase::Fixpoint;
    }
}

/// Returned when fixpoint is reached with zero conclusions. The terminal
/// rule makes this unreachable in practice, but an advisory tool answers
/// with a sentinel rather than failing.
pub const NO_CONCLUSION_SENTINEL: &str = "No conclusion could be derived";

/// The two outputs the engine hands back to its caller.
#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
pub struct EvaluationResult {
    pub summary: String,
    pub conclusions: Vec<Conclusion>,
    pub trace: Vec<TraceEntry>,
}

/// Evaluate one snapshot against the canonical (extended) rule catalog.
///
/// # Errors
/// Returns [`EngineError::InvalidSnapshot`] when the snapshot violates a
/// field domain; no rule runs in that case.
pub fn evaluate(snapshot: LaunchSnapshot) -> Result<EvaluationResult, EngineError> {
    evaluate_with_variant(snapshot, RuleSetVariant::default())
}

/// Evaluate one snapshot against the chosen rule-catalog variant. Each call
/// owns a freshly constructed engine, so concurrent evaluations never share
/// working memory.
///
/// # Errors
/// Returns [`EngineError::InvalidSnapshot`] when the snapshot violates a
/// field domain; no rule runs in that case.
pub fn evaluate_with_variant(
    snapshot: LaunchSnapshot,
    variant: RuleSetVariant,
) -> Result<EvaluationResult, EngineError> {
    let mut engine = InferenceEngine::new(variant);
    engine.install_snapshot(snapshot)?;
    engine.run_to_fixpoint();

    let conclusions = engine.facts.conclusions().to_vec();
    let summary = if conclusions.is_empty() {
        NO_CONCLUSION_SENTINEL.to_string()
    } else {
        conclusions
            .iter()
            .map(|conclusion| format!("{}: {}", conclusion.severity.tag(), conclusion.detail))
            .collect::<Vec<_>>()
            .join("\n")
    };

    Ok(EvaluationResult { summary, conclusions, trace: engine.trace.entries().to_vec() })
}
