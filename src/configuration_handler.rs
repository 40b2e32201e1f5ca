use crate::configuration::Configuration;
use clap::Parser;

/// Command line configuration. A `.env` file is honoured before parsing,
/// and the database URL falls back to the `DATABASE_URL` variable diesel
/// conventionally uses.
#[derive(Debug, Clone, Parser)]
#[command(name = "salon_booking", about = "Hair salon booking service")]
pub struct ConfigurationHandler {
    /// Port the HTTP server listens on.
    #[arg(long, default_value = "3000")]
    port: String,

    /// PostgreSQL connection URL. Omit to run with the in-memory backend
    /// (impersistent bookings, example data seeded at startup).
    #[arg(long)]
    database_url: Option<String>,

    /// Password required by the work-interval administration routes.
    #[arg(long, default_value = "123")]
    admin_password: String,
}

impl ConfigurationHandler {
    pub fn parse_arguments() -> Self {
        dotenvy::dotenv().ok();
        let mut configuration = Self::parse();
        if configuration.database_url.is_none() {
            configuration.database_url = std::env::var("DATABASE_URL").ok();
        }
        configuration
    }
}

impl Configuration for ConfigurationHandler {
    fn password(&self) -> String {
        self.admin_password.clone()
    }

    fn port(&self) -> String {
        self.port.clone()
    }

    fn database_url(&self) -> Option<String> {
        self.database_url.clone()
    }
}
