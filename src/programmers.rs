//! Programmer registration and dispatch
//!
//! Backends are feature-gated; this module lists the ones compiled in and
//! opens one from a programmer string like `nrfjprog:path=/opt/nrfjprog`.

use dkflasher_core::Programmer;

/// Programmer backend shared by all worker threads of a fleet run
pub type BoxedProgrammer = Box<dyn Programmer + Sync>;

/// Information about a programmer backend
pub struct ProgrammerInfo {
    /// Primary name (used for matching)
    pub name: &'static str,
    /// Alternative names/aliases
    pub aliases: &'static [&'static str],
    /// Short description
    pub description: &'static str,
}

/// Get information about all available programmers (enabled at compile time)
#[allow(unused_mut, clippy::vec_init_then_push)]
pub fn available_programmers() -> Vec<ProgrammerInfo> {
    let mut programmers = Vec::new();

    #[cfg(feature = "nrfjprog")]
    programmers.push(ProgrammerInfo {
        name: "nrfjprog",
        aliases: &["jlink"],
        description: "Nordic nrfjprog command-line tool (path=<executable>)",
    });

    #[cfg(feature = "dummy")]
    programmers.push(ProgrammerInfo {
        name: "dummy",
        aliases: &["dry-run"],
        description: "Simulated programmer, records invocations (fail=<op>@<snr>,delay=<ms>)",
    });

    programmers
}

/// Generate help text listing all available programmers
pub fn programmer_help() -> String {
    let programmers = available_programmers();

    if programmers.is_empty() {
        return "No programmers available (recompile with programmer features enabled)".to_string();
    }

    let mut help = String::from("Available programmers:\n");
    for p in &programmers {
        help.push_str(&format!("  {:12} - {}\n", p.name, p.description));
        if !p.aliases.is_empty() {
            let aliases = p.aliases.join(", ");
            help.push_str(&format!("  {:12}   aliases: {}\n", "", aliases));
        }
    }

    help
}

/// Generate a short list of programmer names for CLI help
pub fn programmer_names_short() -> String {
    let programmers = available_programmers();
    let names: Vec<&str> = programmers.iter().map(|p| p.name).collect();
    names.join(", ")
}

/// Resolve a programmer name or alias to its canonical name
pub fn find_programmer(name: &str) -> Option<&'static str> {
    available_programmers()
        .into_iter()
        .find(|p| p.name == name || p.aliases.contains(&name))
        .map(|p| p.name)
}

/// Open the programmer backend named by `programmer`
///
/// The programmer string can be just the name (e.g., "nrfjprog") or include
/// parameters (e.g., "dummy:fail=app@1050012345,delay=100").
pub fn open_programmer(programmer: &str) -> Result<BoxedProgrammer, Box<dyn std::error::Error>> {
    let (name, options) = parse_programmer_string(programmer);

    let canonical_name = match find_programmer(name) {
        Some(n) => n,
        None => return Err(unknown_programmer_error(name)),
    };

    match canonical_name {
        #[cfg(feature = "nrfjprog")]
        "nrfjprog" => {
            log::debug!("Opening nrfjprog backend...");
            dkflasher_nrfjprog::open_nrfjprog(&options)
                .map_err(|e| format!("Invalid nrfjprog parameters: {}", e).into())
        }

        #[cfg(feature = "dummy")]
        "dummy" => {
            log::warn!("Using the dummy programmer: no devices will be touched");
            dkflasher_dummy::open_dummy(&options)
                .map_err(|e| format!("Invalid dummy parameters: {}", e).into())
        }

        _ => {
            let _ = options;
            Err(unknown_programmer_error(name))
        }
    }
}

/// Parse a programmer string into name and options
///
/// Format: "name" or "name:option1=value1,option2=value2"
pub fn parse_programmer_string(s: &str) -> (&str, Vec<(&str, &str)>) {
    if let Some((name, opts)) = s.split_once(':') {
        let options: Vec<_> = opts
            .split(',')
            .filter_map(|opt| opt.split_once('='))
            .collect();
        (name, options)
    } else {
        (s, Vec::new())
    }
}

fn unknown_programmer_error(name: &str) -> Box<dyn std::error::Error> {
    let mut msg = format!("Unknown programmer: {}\n\n", name);
    msg.push_str(&programmer_help());
    msg.push_str("\nUse 'dkflasher list-programmers' for more details");
    msg.into()
}
