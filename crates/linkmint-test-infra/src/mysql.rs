use crate::Result;
use testcontainers::core::{IntoContainerPort, WaitFor};
use testcontainers::runners::AsyncRunner;
use testcontainers::ImageExt;
use testcontainers::{ContainerAsync, GenericImage};
use typed_builder::TypedBuilder;

const IMAGE: &str = "mysql";
const TAG: &str = "8.4";
const PORT: u16 = 3306;

/// Startup line of the real server.
///
/// The entrypoint first boots a networkless server to run init scripts, which
/// logs `ready for connections` with `port: 0`. Only the server started
/// afterwards reports the TCP port, so matching on it skips the first one.
const READY_ON_TCP: &str = "port: 3306 ";

/// Account and schema created when the container boots.
#[derive(Debug, Clone, TypedBuilder)]
pub struct MySqlOptions {
    #[builder(default = "linkmint".to_string(), setter(into))]
    database: String,
    #[builder(default = "linkmint".to_string(), setter(into))]
    user: String,
    #[builder(default = "linkmint".to_string(), setter(into))]
    password: String,
}

impl Default for MySqlOptions {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// A disposable MySQL server.
///
/// [`MySqlServer::start`] returns once the server accepts TCP connections, so
/// callers can connect right away.
pub struct MySqlServer {
    _container: ContainerAsync<GenericImage>,
    database_url: String,
}

impl MySqlServer {
    pub async fn start(options: MySqlOptions) -> Result<Self> {
        let container = GenericImage::new(IMAGE, TAG)
            .with_exposed_port(PORT.tcp())
            .with_wait_for(WaitFor::message_on_stderr(READY_ON_TCP))
            .with_env_var("MYSQL_DATABASE", options.database.as_str())
            .with_env_var("MYSQL_USER", options.user.as_str())
            .with_env_var("MYSQL_PASSWORD", options.password.as_str())
            .with_env_var("MYSQL_RANDOM_ROOT_PASSWORD", "yes")
            .start()
            .await?;

        let host = container.get_host().await?;
        let port = container.get_host_port_ipv4(PORT).await?;
        let database_url = format!(
            "mysql://{}:{}@{host}:{port}/{}",
            options.user, options.password, options.database
        );

        Ok(Self {
            _container: container,
            database_url,
        })
    }

    /// A `mysql://` URL for the configured account and database.
    pub fn database_url(&self) -> &str {
        &self.database_url
    }
}
