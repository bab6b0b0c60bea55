//! One-shot maintenance run: expires lapsed quotations and marks past-due
//! invoices overdue in every hub. Meant to be scheduled daily.

use chrono::Utc;
use dotenvy::dotenv;

use hubcrm::db::establish_connection_pool;
use hubcrm::models::config::ServerConfig;
use hubcrm::repository::DieselRepository;
use hubcrm::services::sweep::run_sweep;

fn main() {
    dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let server_config = match ServerConfig::load() {
        Ok(server_config) => server_config,
        Err(err) => {
            log::error!("Error loading server config: {err}");
            std::process::exit(1);
        }
    };

    let pool = match establish_connection_pool(&server_config.database_url) {
        Ok(pool) => pool,
        Err(e) => {
            log::error!("Failed to establish database connection: {e}");
            std::process::exit(1);
        }
    };
    let repo = DieselRepository::new(pool);

    match run_sweep(&repo, Utc::now().date_naive()) {
        Ok(report) if report.failures > 0 => std::process::exit(2),
        Ok(_) => {}
        Err(err) => {
            log::error!("Sweep failed: {err}");
            std::process::exit(1);
        }
    }
}
