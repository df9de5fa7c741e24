//! Receiver web apps and their message channel.

use async_trait::async_trait;
use cast_protocol::ApplicationInfo;
use cast_runtime::{AppChannel, CommandKind, Result, Session};
use serde_json::Value;

use crate::capabilities::WebAppLauncher;
use crate::service::ensure_application;

/// A launched or joined web app.
///
/// Messages travel on the service's app namespace (the Connect SDK bridge
/// channel by default). The handle stays valid until the app exits, is
/// closed, or the session disconnects.
#[derive(Debug, Clone)]
pub struct WebAppSession {
	app: ApplicationInfo,
	channel: AppChannel,
	session: Session,
}

impl WebAppSession {
	pub fn app(&self) -> &ApplicationInfo {
		&self.app
	}

	pub fn app_id(&self) -> &str {
		&self.app.app_id
	}

	/// True while the app's channel is open.
	pub fn is_connected(&self) -> bool {
		self.channel.is_open()
	}

	/// Sends a plain string, relayed verbatim to the web app.
	pub fn send_text(&self, text: &str) -> Result<()> {
		self.channel.send(Value::String(text.to_string()))
	}

	pub fn send_json(&self, message: Value) -> Result<()> {
		self.channel.send(message)
	}

	/// Sends a JSON object and waits for the web app's correlated reply.
	pub async fn request(&self, message: Value) -> Result<Value> {
		self.channel.request(CommandKind::App, message).await
	}

	/// Handler for messages the web app sends on its own.
	pub fn on_message<F>(&self, handler: F) -> Result<()>
	where
		F: Fn(&Value) + Send + Sync + 'static,
	{
		self.channel.on_message(move |_, payload| handler(payload))
	}

	/// Stops the web app if it is still the joined application.
	pub fn close(&self) -> Result<()> {
		match self.session.joined_application() {
			Some(app) if app.session_id == self.app.session_id => self.session.stop_application(),
			_ => {
				self.channel.close();
				Ok(())
			}
		}
	}
}

/// [`WebAppLauncher`] for a cast session.
#[derive(Debug, Clone)]
pub struct CastWebAppLauncher {
	session: Session,
	app_namespace: String,
}

impl CastWebAppLauncher {
	pub(crate) fn new(session: Session, app_namespace: String) -> Self {
		Self { session, app_namespace }
	}

	fn web_app_session(&self, app: ApplicationInfo) -> Result<WebAppSession> {
		let channel = self.session.open_channel(&self.app_namespace)?;
		Ok(WebAppSession {
			app,
			channel,
			session: self.session.clone(),
		})
	}
}

#[async_trait]
impl WebAppLauncher for CastWebAppLauncher {
	async fn launch_web_app_with_relaunch(&self, app_id: &str, relaunch: bool) -> Result<WebAppSession> {
		let app = ensure_application(&self.session, app_id, relaunch).await?;
		self.web_app_session(app)
	}

	async fn join_web_app(&self, app_id: &str) -> Result<WebAppSession> {
		let app = match self.session.joined_application() {
			Some(app) if app.app_id == app_id => app,
			Some(_) => {
				self.session.stop_application()?;
				self.session.join_application(app_id).await?
			}
			None => self.session.join_application(app_id).await?,
		};
		self.web_app_session(app)
	}

	async fn close_web_app(&self, session: &WebAppSession) -> Result<()> {
		session.close()
	}
}
