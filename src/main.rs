use std::process;

use chrono::Utc;
use clap::{value_parser, Arg, Command};
use tracing::debug;
use tracing_subscriber::EnvFilter;

mod crl;
mod error;
mod fetch;
mod verdict;

use error::CheckError;
use verdict::{Thresholds, Verdict};

fn cli() -> Command {
    Command::new("check_crl")
        .about("Nagios-style probe that checks the freshness of a CRL fetched from a URL.")
        .arg(
            Arg::new("url")
                .short('u')
                .long("url")
                .required(true)
                .num_args(1)
                .help("URL of the CRL to check (http or https)."),
        )
        .arg(
            Arg::new("warning")
                .short('w')
                .long("warning")
                .required(true)
                .num_args(1)
                .value_parser(value_parser!(i64))
                .help("Minutes before nextUpdate at which to raise WARNING."),
        )
        .arg(
            Arg::new("critical")
                .short('c')
                .long("critical")
                .required(true)
                .num_args(1)
                .value_parser(value_parser!(i64))
                .help("Minutes before nextUpdate at which to raise CRITICAL."),
        )
        .after_help(
            "Example, to warn when the CRL expires within 8 hours and go critical within 6:\n  \
             check_crl -u \"http://domain.tld/url/crl.crl\" -w 480 -c 360",
        )
}

/// Run one check end-to-end: fetch, detect encoding, parse, classify.
/// Pure with respect to the process: no printing, no exiting.
fn run_check(url: &str, thresholds: &Thresholds) -> Result<Verdict, CheckError> {
    let retrieved = fetch::fetch_crl(url)?;
    let encoding = crl::detect_encoding(&retrieved.bytes);
    let parsed = crl::parse_crl(&retrieved.bytes, encoding).map_err(|source| CheckError::Parse {
        url: retrieved.url.clone(),
        source,
    })?;
    Ok(verdict::classify(parsed.next_update, Utc::now(), thresholds))
}

fn main() {
    let matches = cli().get_matches();

    // Diagnostics go to stderr; stdout carries exactly the one plugin line.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let url = matches.get_one::<String>("url").unwrap();
    let warn_minutes = *matches.get_one::<i64>("warning").unwrap();
    let crit_minutes = *matches.get_one::<i64>("critical").unwrap();

    // An inverted pair would make severity non-monotonic, so reject it
    // up front instead of producing confusing verdicts.
    if crit_minutes > warn_minutes {
        cli()
            .error(
                clap::error::ErrorKind::ValueValidation,
                format!("--critical ({crit_minutes}) must not exceed --warning ({warn_minutes})"),
            )
            .exit();
    }

    let thresholds = Thresholds {
        warn_minutes,
        crit_minutes,
    };

    let code = match run_check(url, &thresholds) {
        Ok(verdict) => {
            println!("{}: {}", verdict.status, verdict.message);
            verdict.status.exit_code()
        }
        Err(err) => {
            debug!(error = ?err, "check failed");
            println!("{}: {}", err.status(), err);
            err.status().exit_code()
        }
    };

    process::exit(code);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        cli().debug_assert();
    }

    #[test]
    fn all_three_flags_are_required() {
        for args in [
            vec!["check_crl"],
            vec!["check_crl", "-u", "http://crl.example/ca.crl"],
            vec!["check_crl", "-u", "http://crl.example/ca.crl", "-w", "480"],
            vec!["check_crl", "-w", "480", "-c", "360"],
        ] {
            assert!(cli().try_get_matches_from(args).is_err());
        }
    }

    #[test]
    fn long_and_short_flags_parse() {
        let matches = cli()
            .try_get_matches_from([
                "check_crl",
                "--url",
                "http://crl.example/ca.crl",
                "--warning",
                "480",
                "--critical",
                "360",
            ])
            .unwrap();
        assert_eq!(
            matches.get_one::<String>("url").unwrap(),
            "http://crl.example/ca.crl"
        );
        assert_eq!(*matches.get_one::<i64>("warning").unwrap(), 480);
        assert_eq!(*matches.get_one::<i64>("critical").unwrap(), 360);
    }

    #[test]
    fn non_numeric_threshold_is_rejected() {
        let result = cli().try_get_matches_from([
            "check_crl",
            "-u",
            "http://crl.example/ca.crl",
            "-w",
            "eight hours",
            "-c",
            "360",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn unreachable_url_yields_critical_exit_code() {
        let thresholds = Thresholds {
            warn_minutes: 480,
            crit_minutes: 360,
        };
        let err = run_check("http://127.0.0.1:1/ca.crl", &thresholds).unwrap_err();
        assert_eq!(err.status().exit_code(), 2);
    }
}
