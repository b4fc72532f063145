use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{bail, Context};
use clap::{Args, Parser, Subcommand};
use lib_sicap::portal::defaults::{compose, procedure_view_query};
use lib_sicap::utils::dates;
use lib_sicap::{ClientOptions, Endpoint, HttpResponse, Overrides, ProcedurePhase, SicapClient};
use serde_json::Value;
use tracing::info;

/// Query the SICAP public procurement portal (e-licitatie.ro) from the shell.
#[derive(Parser, Debug)]
#[command(
    name = "sicap",
    version,
    about,
    long_about = "Calls the public JSON API of e-licitatie.ro. List commands send the portal's default filters, adjusted with --set KEY=VALUE or a --body file. Settings are read from --config, then SICAP_* environment variables (a .env file is honoured), then command-line flags."
)]
struct Cli {
    /// Use plain http instead of https.
    #[arg(long, global = true)]
    insecure: bool,

    /// Log INFO-level diagnostics to stderr.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Overall request timeout in seconds.
    #[arg(long, value_name = "SECS", global = true)]
    timeout: Option<f64>,

    /// Connect timeout in seconds.
    #[arg(long, value_name = "SECS", global = true)]
    connect_timeout: Option<f64>,

    /// JSON file with client options.
    #[arg(long, value_name = "FILE", env = "SICAP_CONFIG", global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

/// Payload adjustments shared by the list commands.
#[derive(Args, Debug, Default)]
struct BodyArgs {
    /// Override one field; VALUE is parsed as JSON and falls back to a plain string.
    #[arg(long = "set", value_name = "KEY=VALUE", value_parser = parse_assignment)]
    set: Vec<(String, Value)>,

    /// JSON object merged over the defaults before any --set.
    #[arg(long, value_name = "FILE")]
    body: Option<PathBuf>,

    /// Print the composed payload and exit without calling the portal.
    #[arg(long)]
    dry_run: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Portal clock, as returned by the server.
    ServerTime,
    /// Contract award notices.
    CaNotices(BodyArgs),
    /// One contract award notice.
    CaNotice { id: u64 },
    /// Contracts of an award notice.
    CaNoticeContracts(BodyArgs),
    /// Prior information notices.
    PiNotices(BodyArgs),
    /// Contract notices.
    CNotices(BodyArgs),
    /// Direct award notices.
    DaAwardNotices(BodyArgs),
    /// One direct award notice.
    DaAwardNotice { id: u64 },
    /// Direct acquisitions.
    DirectAcquisitions(BodyArgs),
    /// One direct acquisition.
    DirectAcquisition { id: u64 },
    /// Contracting authority profile.
    CaEntity { id: u64 },
    /// Supplier profile.
    SuEntity { id: u64 },
    /// Request-for-quotation invitation.
    RfqInvitation { id: u64 },
    /// Reports attached to a procedure.
    ProcedureReports { id: u64 },
    /// Procedure statement.
    ProcedureStatement { id: u64 },
    /// Procedure page; --set adjusts the query string (e.g. procedureLotId).
    Procedure {
        id: u64,
        #[command(flatten)]
        query: BodyArgs,
    },
    /// Look up a CPV code, search descriptions, or list the table.
    Cpv {
        code: Option<String>,
        /// Case-insensitive substring of the description.
        #[arg(long, conflicts_with = "code")]
        search: Option<String>,
    },
    /// Procedure phase ids accepted by sysProcedurePhaseId.
    Phases,
}

fn main() -> anyhow::Result<ExitCode> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let options = resolve_options(&cli)?;
    if let Command::Phases = cli.command {
        return print_phases();
    }
    if let Some(payload) = dry_run_payload(&cli.command)? {
        print_json(&payload)?;
        return Ok(ExitCode::SUCCESS);
    }

    let client = SicapClient::new(options).context("failed to open the portal session")?;
    info!(command = ?cli.command, "running");
    run(&client, cli.command)
}

/// File, then environment, then flags.
fn resolve_options(cli: &Cli) -> anyhow::Result<ClientOptions> {
    let mut options = match &cli.config {
        Some(path) => ClientOptions::from_json_file(path)
            .with_context(|| format!("failed to load {}", path.display()))?,
        None => ClientOptions::default(),
    };
    options = options.with_env()?;
    apply_flags(&mut options, cli);
    options.validate()?;
    Ok(options)
}

fn apply_flags(options: &mut ClientOptions, cli: &Cli) {
    if cli.insecure {
        options.secure = false;
    }
    if cli.verbose {
        options.verbose = true;
    }
    if cli.timeout.is_some() || cli.connect_timeout.is_some() {
        let mut t = options.timeouts();
        if let Some(secs) = cli.timeout {
            t.overall_secs = secs;
        }
        if let Some(secs) = cli.connect_timeout {
            t.connect_secs = secs;
        }
        options.timeout = Some(t);
    }
}

fn run(client: &SicapClient, command: Command) -> anyhow::Result<ExitCode> {
    let response = match command {
        Command::ServerTime => {
            println!("{}", client.get_server_time()?);
            return Ok(ExitCode::SUCCESS);
        }
        Command::CaNotices(args) => list(client, Endpoint::CaNoticeList, &args)?,
        Command::CaNoticeContracts(args) => list(client, Endpoint::CaNoticeContracts, &args)?,
        Command::PiNotices(args) => list(client, Endpoint::PublicPiNoticeAll, &args)?,
        Command::CNotices(args) => list(client, Endpoint::CNoticeList, &args)?,
        Command::DaAwardNotices(args) => list(client, Endpoint::DaAwardNoticeList, &args)?,
        Command::DirectAcquisitions(args) => list(client, Endpoint::DirectAcquisitionList, &args)?,
        Command::CaNotice { id } => client.get_ca_notice(id)?,
        Command::DaAwardNotice { id } => client.get_public_da_award_notice(id)?,
        Command::DirectAcquisition { id } => client.get_public_direct_acquisition(id)?,
        Command::CaEntity { id } => client.get_ca_entity_view(id)?,
        Command::SuEntity { id } => client.get_su_entity_view(id)?,
        Command::RfqInvitation { id } => client.get_rfq_invitation_view(id)?,
        Command::ProcedureReports { id } => client.get_procedure_reports(id)?,
        Command::ProcedureStatement { id } => client.get_procedure_statement_view(id)?,
        Command::Procedure { id, query } => client.get_procedure_view(id, overrides_from(&query)?)?,
        Command::Cpv { code, search } => return print_cpvs(client, code, search),
        Command::Phases => return print_phases(),
    };
    print_response(&response)
}

fn list(client: &SicapClient, endpoint: Endpoint, args: &BodyArgs) -> anyhow::Result<HttpResponse> {
    let overrides = overrides_from(args)?;
    let response = match endpoint {
        Endpoint::CaNoticeList => client.get_ca_notice_list(overrides)?,
        Endpoint::CaNoticeContracts => client.get_ca_notice_contracts(overrides)?,
        Endpoint::PublicPiNoticeAll => client.get_public_pi_notice_all(overrides)?,
        Endpoint::CNoticeList => client.get_c_notice_list(overrides)?,
        Endpoint::DaAwardNoticeList => client.get_da_award_notice_list(overrides)?,
        Endpoint::DirectAcquisitionList => client.get_direct_acquisition_list(overrides)?,
    };
    Ok(response)
}

fn list_endpoint(command: &Command) -> Option<(Endpoint, &BodyArgs)> {
    match command {
        Command::CaNotices(args) => Some((Endpoint::CaNoticeList, args)),
        Command::CaNoticeContracts(args) => Some((Endpoint::CaNoticeContracts, args)),
        Command::PiNotices(args) => Some((Endpoint::PublicPiNoticeAll, args)),
        Command::CNotices(args) => Some((Endpoint::CNoticeList, args)),
        Command::DaAwardNotices(args) => Some((Endpoint::DaAwardNoticeList, args)),
        Command::DirectAcquisitions(args) => Some((Endpoint::DirectAcquisitionList, args)),
        _ => None,
    }
}

/// The payload a `--dry-run` command would send. `None` when no dry run was asked for.
fn dry_run_payload(command: &Command) -> anyhow::Result<Option<Value>> {
    if let Command::Procedure { id, query } = command {
        if !query.dry_run {
            return Ok(None);
        }
        return Ok(Some(Value::Object(procedure_view_query(
            *id,
            overrides_from(query)?,
        ))));
    }
    match list_endpoint(command) {
        Some((endpoint, args)) if args.dry_run => Ok(Some(Value::Object(compose(
            endpoint,
            dates::now(),
            overrides_from(args)?,
        )))),
        _ => Ok(None),
    }
}

fn overrides_from(args: &BodyArgs) -> anyhow::Result<Overrides> {
    let mut overrides = match &args.body {
        Some(path) => {
            let raw = fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            match serde_json::from_str::<Value>(&raw)
                .with_context(|| format!("{} is not valid JSON", path.display()))?
            {
                Value::Object(map) => map,
                _ => bail!("{} must contain a JSON object", path.display()),
            }
        }
        None => Overrides::new(),
    };
    for (key, value) in &args.set {
        overrides.insert(key.clone(), value.clone());
    }
    Ok(overrides)
}

fn parse_assignment(raw: &str) -> Result<(String, Value), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got {raw:?}"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("empty key in {raw:?}"));
    }
    let value = serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_string()));
    Ok((key.to_string(), value))
}

fn print_response(response: &HttpResponse) -> anyhow::Result<ExitCode> {
    match serde_json::from_str::<Value>(&response.body) {
        Ok(value) => print_json(&value)?,
        Err(_) => println!("{}", response.body),
    }
    if response.is_ok() {
        Ok(ExitCode::SUCCESS)
    } else {
        eprintln!("portal answered HTTP {}", response.status);
        Ok(ExitCode::FAILURE)
    }
}

fn print_json(value: &Value) -> anyhow::Result<()> {
    let mut stdout = io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, value)?;
    writeln!(stdout)?;
    Ok(())
}

fn print_cpvs(
    client: &SicapClient,
    code: Option<String>,
    search: Option<String>,
) -> anyhow::Result<ExitCode> {
    let table = client.cpvs()?;
    if let Some(code) = code {
        return match table.get(&code) {
            Some(description) => {
                println!("{code}\t{description}");
                Ok(ExitCode::SUCCESS)
            }
            None => {
                eprintln!("unknown CPV code {code}");
                Ok(ExitCode::FAILURE)
            }
        };
    }

    let mut stdout = io::stdout().lock();
    match search {
        Some(needle) => {
            for (code, description) in table.search(&needle) {
                writeln!(stdout, "{code}\t{description}")?;
            }
        }
        None => {
            for (code, description) in table.iter() {
                writeln!(stdout, "{code}\t{description}")?;
            }
        }
    }
    Ok(ExitCode::SUCCESS)
}

fn print_phases() -> anyhow::Result<ExitCode> {
    let mut stdout = io::stdout().lock();
    for phase in ProcedurePhase::ALL {
        writeln!(stdout, "{}\t{}", phase.id(), phase.label())?;
    }
    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("sicap").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn assignment_values_are_json_or_text() {
        assert_eq!(parse_assignment("pageSize=50").unwrap(), ("pageSize".into(), json!(50)));
        assert_eq!(parse_assignment("x=null").unwrap().1, Value::Null);
        assert_eq!(
            parse_assignment(r#"contractDate={"from":"2024-01-01"}"#).unwrap().1,
            json!({ "from": "2024-01-01" })
        );
        assert_eq!(parse_assignment("cpvCodeId=45000000-7").unwrap().1, json!("45000000-7"));
        assert_eq!(parse_assignment("q=a=b").unwrap(), ("q".into(), json!("a=b")));
        assert!(parse_assignment("novalue").is_err());
        assert!(parse_assignment("=1").is_err());
    }

    #[test]
    fn set_flags_land_on_list_commands() {
        let cli = parse(&["c-notices", "--set", "pageSize=10", "--set", "sysProcedurePhaseId=9", "--dry-run"]);
        let Command::CNotices(args) = cli.command else { panic!("wrong command") };
        assert!(args.dry_run);
        let overrides = overrides_from(&args).unwrap();
        assert_eq!(overrides["pageSize"], 10);
        assert_eq!(overrides["sysProcedurePhaseId"], 9);
    }

    #[test]
    fn set_wins_over_body_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"pageSize": 5, "cNoticeId": 7}}"#).unwrap();
        let args = BodyArgs {
            set: vec![("pageSize".into(), json!(20))],
            body: Some(file.path().to_path_buf()),
            dry_run: false,
        };
        let overrides = overrides_from(&args).unwrap();
        assert_eq!(overrides["pageSize"], 20);
        assert_eq!(overrides["cNoticeId"], 7);
    }

    #[test]
    fn body_file_must_hold_an_object() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "[1, 2]").unwrap();
        let args = BodyArgs {
            body: Some(file.path().to_path_buf()),
            ..BodyArgs::default()
        };
        assert!(overrides_from(&args).is_err());
    }

    #[test]
    fn flags_override_loaded_options() {
        let cli = parse(&["--insecure", "--timeout", "5", "server-time"]);
        let mut options = ClientOptions::default();
        apply_flags(&mut options, &cli);
        assert!(!options.secure);
        assert_eq!(options.timeouts().overall_secs, 5.0);
        assert_eq!(options.timeouts().connect_secs, 10.0);
    }

    #[test]
    fn dry_run_composes_without_a_session() {
        let cli = parse(&["c-notices", "--set", "pageSize=10", "--dry-run"]);
        let payload = dry_run_payload(&cli.command).unwrap().unwrap();
        assert_eq!(payload["pageSize"], 10);
        assert_eq!(payload["sysProcedureStateId"], 2);
        assert_eq!(payload["sysProcedurePhaseId"], 4);

        let cli = parse(&["procedure", "8", "--dry-run"]);
        let payload = dry_run_payload(&cli.command).unwrap().unwrap();
        assert_eq!(payload, json!({ "procedureId": 8, "procedureLotId": "undefined" }));
    }

    #[test]
    fn live_commands_have_no_dry_run_payload() {
        let cases: [&[&str]; 4] = [&["c-notices"], &["procedure", "8"], &["ca-notice", "1"], &["server-time"]];
        for args in cases {
            assert!(dry_run_payload(&parse(args).command).unwrap().is_none(), "{args:?}");
        }
    }

    #[test]
    fn global_flags_follow_the_subcommand() {
        let cli = parse(&["ca-notice", "17", "--verbose"]);
        assert!(cli.verbose);
        assert!(matches!(cli.command, Command::CaNotice { id: 17 }));
    }

    #[test]
    fn procedure_accepts_query_overrides() {
        let cli = parse(&["procedure", "3", "--set", "procedureLotId=12"]);
        let Command::Procedure { id, query } = cli.command else { panic!("wrong command") };
        let params = procedure_view_query(id, overrides_from(&query).unwrap());
        assert_eq!(params["procedureId"], 3);
        assert_eq!(params["procedureLotId"], 12);
    }
}
