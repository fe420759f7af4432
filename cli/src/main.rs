use clap::{Args, Parser, Subcommand};
use serde_json::{Value, json};
use zabbix_api::{Params, ZabbixClient, ZabbixConfig, ZabbixError, into_result, params};

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("{code}: {0}", code = .0.error_code())]
    Zabbix(#[from] ZabbixError),
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("--params must be a JSON object")]
    ParamsNotObject,
    #[error("host.get returned a non-array result")]
    UnexpectedHosts,
}

#[derive(Parser, Debug)]
#[command(name = "zabbix-cli", about = "Zabbix JSON-RPC API client")]
struct Cli {
    /// Environment selector; reads `ZABBIX_<ENV>_URL` and friends.
    #[arg(long, env = "ZABBIX_ENV", default_value = "dev")]
    environment: String,

    #[command(flatten)]
    auth: AuthArgs,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args, Debug)]
struct AuthArgs {
    /// Overrides the environment's API token.
    #[arg(long)]
    api_token: Option<String>,

    /// Log in with a session instead of a token.
    #[arg(long, env = "ZABBIX_USERNAME", requires = "password")]
    username: Option<String>,

    #[arg(long, env = "ZABBIX_PASSWORD", requires = "username", hide_env_values = true)]
    password: Option<String>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the server's API version.
    Version,
    /// Invoke any catalogued `<namespace>.<action>`.
    Call {
        namespace: String,
        action: String,
        #[arg(long, help = "JSON object forwarded as the request params")]
        params: Option<String>,
    },
    /// List hosts whose name contains a substring.
    Hosts {
        #[arg(long, default_value = "server")]
        name_contains: String,
    },
    /// Fetch SLI data for one SLA.
    Sli {
        #[arg(long)]
        sla_id: u64,
        #[arg(long)]
        period_from: i64,
        #[arg(long)]
        period_to: i64,
    },
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let cli = Cli::parse();
    let config = ZabbixConfig::from_env(Some(&cli.environment))?;
    let client = connect(&config, &cli.auth).await?;

    let outcome = run(&client, cli.command).await;
    let closed = client.close().await;
    outcome?;
    closed?;
    Ok(())
}

async fn connect(config: &ZabbixConfig, auth: &AuthArgs) -> Result<ZabbixClient, CliError> {
    if let (Some(username), Some(password)) = (&auth.username, &auth.password) {
        return Ok(ZabbixClient::login(config, username, password).await?);
    }
    let client = match &auth.api_token {
        Some(token) => ZabbixClient::with_token(config, token.as_str())?,
        None => ZabbixClient::new(config)?,
    };
    Ok(client)
}

async fn run(client: &ZabbixClient, command: Command) -> Result<(), CliError> {
    match command {
        Command::Version => {
            let response = client.apiinfo().version(Params::new()).await?;
            print_json(&into_result(response)?)
        }
        Command::Call {
            namespace,
            action,
            params,
        } => {
            let params = parse_params(params.as_deref())?;
            let response = client.namespace(&namespace)?.invoke(&action, params).await?;
            print_json(&into_result(response)?)
        }
        Command::Hosts { name_contains } => {
            let response = client
                .host()
                .get(params!({ "output": ["hostid", "name"] }))
                .await?;
            let hosts = into_result(response)?;
            print_json(&matching_hosts(&hosts, &name_contains)?)
        }
        Command::Sli {
            sla_id,
            period_from,
            period_to,
        } => {
            let response = client
                .sla()
                .get_sli(params!({
                    "slaid": sla_id,
                    "period_from": period_from,
                    "period_to": period_to,
                }))
                .await?;
            print_json(&into_result(response)?)
        }
    }
}

fn parse_params(raw: Option<&str>) -> Result<Params, CliError> {
    let Some(raw) = raw else {
        return Ok(Params::new());
    };
    match serde_json::from_str::<Value>(raw)? {
        Value::Object(map) => Ok(map),
        _ => Err(CliError::ParamsNotObject),
    }
}

/// Names and ids of hosts whose name contains `needle`, case-insensitively.
fn matching_hosts(hosts: &Value, needle: &str) -> Result<Value, CliError> {
    let hosts = hosts.as_array().ok_or(CliError::UnexpectedHosts)?;
    let needle = needle.to_lowercase();

    let mut names = Vec::new();
    let mut ids = Vec::new();
    for host in hosts {
        let name = host.get("name").and_then(Value::as_str).unwrap_or_default();
        if name.to_lowercase().contains(&needle) {
            names.push(name.to_owned());
            ids.push(host.get("hostid").cloned().unwrap_or(Value::Null));
        }
    }
    Ok(json!({ "name": names, "hostid": ids }))
}

fn print_json(value: &Value) -> Result<(), CliError> {
    let rendered = serde_json::to_string_pretty(value)?;
    println!("{rendered}");
    Ok(())
}

#[cfg(test)]
#[path = "main_test.rs"]
mod tests;
