use std::cell::OnceCell;
use std::rc::Rc;

use chainargs_core::{
    Action, Flag, FlagScope, OutputFormat, ParseStatus, Registry, RegistryDescription,
    format_description, help,
};
use tracing::debug;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

const PACKAGE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Status returned by `sum` when an operand is not a number.
const SUM_BAD_OPERAND: i32 = 2;

/// Logs go to stderr; `RUST_LOG` overrides the default `warn` level.
fn setup_logging() -> Result<(), String> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr)
                .compact(),
        )
        .with(filter)
        .try_init()
        .map_err(|e| format!("failed to initialize logging: {e}"))
}

fn main() {
    if let Err(err) = setup_logging() {
        eprintln!("warning: {err}");
    }

    let argv: Vec<String> = std::env::args().collect();
    match run(&argv) {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(1);
        }
    }
}

fn run(argv: &[String]) -> Result<i32, String> {
    let snapshot = Rc::new(OnceCell::new());
    let mut registry = build_registry(Rc::clone(&snapshot)).map_err(|e| e.to_string())?;

    let status = registry.parse(argv);
    debug!(?status, "Parsed command line");
    // Set exactly once, before any callback runs; `describe` prints it.
    snapshot.set(registry.describe()).ok();

    match status {
        ParseStatus::Ok => Ok(registry.start()),
        ParseStatus::Help => {
            let description = registry.describe();
            let text = registry
                .help_topic(argv)
                .and_then(|topic| help::render_action_help(&description, topic))
                .unwrap_or_else(|| help::render_usage(&description));
            print!("{text}");
            Ok(0)
        }
        ParseStatus::Version => {
            print!("{}", help::render_version(&registry.describe()));
            Ok(0)
        }
        ParseStatus::Error | ParseStatus::InvalidFlag => {
            if let Some(failure) = registry.parse_failure() {
                eprintln!("error: {failure}");
            }
            eprint!("{}", help::render_usage(&registry.describe()));
            Ok(1)
        }
    }
}

fn build_registry(snapshot: Rc<OnceCell<RegistryDescription>>) -> chainargs_core::Result<Registry> {
    let mut registry = Registry::new();
    registry.set_app_name("chainargs-demo");
    registry.set_version(PACKAGE_VERSION);
    registry.set_help_banner("Demonstrates chained actions and scoped flags.");
    registry.set_delimiters(["+"]);

    registry.define_global_flag(
        Flag::boolean("verbose", false).with_description("Print what each action is doing"),
    )?;
    registry.define_global_flag(
        Flag::integer("retries", 3)
            .with_description("How often copy would retry")
            .with_validator(|n| *n >= 0),
    )?;
    registry.define_global_flag(
        Flag::string("label", "").with_description("Prefix for echoed text"),
    )?;

    registry.define_action(
        Action::new("copy", 2, copy)
            .with_description("Show the copy that would be performed")
            .with_help("Takes a source and a destination. Cannot be chained."),
    )?;
    registry.define_action_flag(
        "copy",
        Flag::boolean("force", false).with_description("Overwrite the destination"),
    )?;

    registry.define_action(
        Action::new("echo", 1, echo)
            .chainable()
            .with_description("Print a line of text"),
    )?;
    registry.define_action_flag(
        "echo",
        Flag::boolean("upper", false).with_description("Print in upper case"),
    )?;

    registry.define_action(
        Action::new("sum", 2, sum)
            .chainable()
            .with_description("Print the scaled sum of two numbers"),
    )?;
    registry.define_action_flag(
        "sum",
        Flag::double("scale", 1.0).with_description("Factor applied to the sum"),
    )?;

    registry.define_action(
        Action::new("describe", 0, move |flags, _| describe(&snapshot, flags))
            .with_description("Print the registry description"),
    )?;
    registry.define_action_flag(
        "describe",
        Flag::string("format", "json")
            .with_description("Output format (json or yaml)")
            .with_validator(|f| matches!(f.as_str(), "json" | "yaml")),
    )?;

    Ok(registry)
}

fn copy(flags: &mut FlagScope<'_>, args: &[String]) -> i32 {
    let force = flags.get::<bool>("force").unwrap_or(false);
    if flags.get::<bool>("verbose").unwrap_or(false) {
        let retries = flags.get::<i64>("retries").unwrap_or(0);
        eprintln!("copy: force={force} retries={retries}");
    }
    let mode = if force { " (overwrite)" } else { "" };
    println!("copy {} -> {}{mode}", args[0], args[1]);
    0
}

fn echo(flags: &mut FlagScope<'_>, args: &[String]) -> i32 {
    let mut text = args[0].clone();
    if flags.get::<bool>("upper").unwrap_or(false) {
        text = text.to_uppercase();
    }
    match flags.get::<String>("label") {
        Ok(label) if !label.is_empty() => println!("[{label}] {text}"),
        _ => println!("{text}"),
    }
    0
}

fn sum(flags: &mut FlagScope<'_>, args: &[String]) -> i32 {
    let (Ok(a), Ok(b)) = (args[0].parse::<f64>(), args[1].parse::<f64>()) else {
        eprintln!("sum: operands must be numbers, got `{}` and `{}`", args[0], args[1]);
        return SUM_BAD_OPERAND;
    };
    let scale = flags.get::<f64>("scale").unwrap_or(1.0);
    if flags.get::<bool>("verbose").unwrap_or(false) {
        eprintln!("sum: ({a} + {b}) * {scale}");
    }
    println!("{}", (a + b) * scale);
    0
}

fn describe(snapshot: &OnceCell<RegistryDescription>, flags: &mut FlagScope<'_>) -> i32 {
    let Some(description) = snapshot.get() else {
        eprintln!("describe: registry snapshot unavailable");
        return 1;
    };
    let format = flags
        .get::<String>("format")
        .ok()
        .and_then(|name| OutputFormat::from_name(&name))
        .unwrap_or(OutputFormat::Json);
    match format_description(description, format) {
        Ok(text) => {
            println!("{}", text.trim_end());
            0
        }
        Err(err) => {
            eprintln!("error: {err}");
            1
        }
    }
}
