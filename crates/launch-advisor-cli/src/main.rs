use anyhow::Result;
use clap::{Args, Parser, Subcommand, ValueEnum};
use launch_advisor_api::{EvaluateRequest, EvaluationReport, LaunchAdvisorApi};
use launch_advisor_core::{MainEngineStatus, RuleSetVariant, SubsystemStatus, WeatherState};
use serde_json::Value;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

const CLI_CONTRACT_VERSION: &str = "cli.v1";

#[derive(Debug, Parser)]
#[command(name = "gonogo")]
#[command(about = "Pre-launch telemetry advisor")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Evaluate one telemetry snapshot and print the recommendation.
    Evaluate(EvaluateArgs),
    /// List the rule catalog for a variant.
    Rules(RulesArgs),
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum MainEngineArg {
    Nominal,
    Anomaly,
}

impl From<MainEngineArg> for MainEngineStatus {
    fn from(value: MainEngineArg) -> Self {
        match value {
            MainEngineArg::Nominal => Self::Nominal,
            MainEngineArg::Anomaly => Self::Anomaly,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum StatusArg {
    Ok,
    Fail,
}

impl From<StatusArg> for SubsystemStatus {
    fn from(value: StatusArg) -> Self {
        match value {
            StatusArg::Ok => Self::Ok,
            StatusArg::Fail => Self::Fail,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum WeatherArg {
    Clear,
    Overcast,
}

impl From<WeatherArg> for WeatherState {
    fn from(value: WeatherArg) -> Self {
        match value {
            WeatherArg::Clear => Self::Clear,
            WeatherArg::Overcast => Self::Overcast,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum RulesetArg {
    Extended,
    Baseline,
}

impl From<RulesetArg> for RuleSetVariant {
    fn from(value: RulesetArg) -> Self {
        match value {
            RulesetArg::Extended => Self::Extended,
            RulesetArg::Baseline => Self::Baseline,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputArg {
    Text,
    Json,
}

#[derive(Debug, Args)]
struct EvaluateArgs {
    #[arg(long, default_value_t = 100)]
    fuel_level: u8,
    #[arg(long, value_enum, default_value_t = MainEngineArg::Nominal)]
    main_engine: MainEngineArg,
    #[arg(long, value_enum, default_value_t = StatusArg::Ok)]
    tank_pressure: StatusArg,
    #[arg(long, value_enum, default_value_t = StatusArg::Ok)]
    navigation: StatusArg,
    #[arg(long, value_enum, default_value_t = StatusArg::Ok)]
    communication: StatusArg,
    #[arg(long, value_enum, default_value_t = StatusArg::Ok)]
    electrical: StatusArg,
    #[arg(long, value_enum, default_value_t = StatusArg::Ok)]
    control_software: StatusArg,
    #[arg(long, default_value_t = 0)]
    precipitation_probability: u8,
    #[arg(long, value_enum, default_value_t = WeatherArg::Clear)]
    weather: WeatherArg,
    #[arg(long, value_enum, default_value_t = StatusArg::Ok)]
    sensors: StatusArg,
    #[arg(long, value_enum, default_value_t = StatusArg::Ok)]
    aerodynamics: StatusArg,
    #[arg(long, value_enum, default_value_t = RulesetArg::Extended)]
    ruleset: RulesetArg,
    #[arg(long)]
    as_of: Option<String>,
    #[arg(long, value_enum, default_value_t = OutputArg::Text)]
    output: OutputArg,
}

#[derive(Debug, Args)]
struct RulesArgs {
    #[arg(long, value_enum, default_value_t = RulesetArg::Extended)]
    ruleset: RulesetArg,
}

fn with_contract_version(value: Value) -> Value {
    match value {
        Value::Object(mut object) => {
            object.insert(
                "contract_version".to_string(),
                Value::String(CLI_CONTRACT_VERSION.to_string()),
            );
            Value::Object(object)
        }
        other => serde_json::json!({
            "contract_version": CLI_CONTRACT_VERSION,
            "payload": other
        }),
    }
}

fn emit_json(value: Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(&with_contract_version(value))?);
    Ok(())
}

fn emit_text(report: &EvaluationReport) {
    println!("disposition: {}", report.disposition.as_str());
    println!("ruleset: {}", report.ruleset_version);
    println!("report: {}", report.report_id);
    println!();
    println!("{}", report.summary);
    println!();
    println!("fired rules:");
    for (index, entry) in report.trace.iter().enumerate() {
        println!("{:>3}. {} [{}]", index + 1, entry.rule, entry.trigger);
        println!("     {}", entry.justification);
    }
}

fn run_evaluate(args: EvaluateArgs) -> Result<()> {
    let as_of = match &args.as_of {
        Some(raw) => Some(OffsetDateTime::parse(raw, &Rfc3339)?),
        None => None,
    };

    let request = EvaluateRequest {
        fuel_level: args.fuel_level,
        main_engine: args.main_engine.into(),
        tank_pressure: args.tank_pressure.into(),
        navigation: args.navigation.into(),
        communication: args.communication.into(),
        electrical: args.electrical.into(),
        control_software: args.control_software.into(),
        precipitation_probability: args.precipitation_probability,
        weather: args.weather.into(),
        sensors: args.sensors.into(),
        aerodynamics: args.aerodynamics.into(),
        ruleset: Some(args.ruleset.into()),
        as_of,
    };

    let api = LaunchAdvisorApi::default();
    let report = api.evaluate(request)?;

    match args.output {
        OutputArg::Text => {
            emit_text(&report);
            Ok(())
        }
        OutputArg::Json => emit_json(serde_json::to_value(&report)?),
    }
}

fn run_rules(args: RulesArgs) -> Result<()> {
    let api = LaunchAdvisorApi::new(args.ruleset.into());
    emit_json(serde_json::json!({
        "ruleset_version": api.default_variant().version(),
        "rules": api.ruleset(),
    }))
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Command::Evaluate(args) => run_evaluate(args),
        Command::Rules(args) => run_rules(args),
    }
}
