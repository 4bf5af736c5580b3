use stepwise_graph::{Key, Process, Team};
use stepwise_wire::{DecodeContext, Encode};

use crate::endpoint::Endpoint;
use crate::error::ClientError;
use crate::transport::{Transport, Verb};

/// Stores and retrieves processes and teams through a [`Transport`].
///
/// Decoding always goes through a caller-supplied [`DecodeContext`], so
/// fetched entities land in an explicit resolution scope.
#[derive(Debug, Clone)]
pub struct Client<T> {
  transport: T,
}

impl<T: Transport> Client<T> {
  pub fn new(transport: T) -> Self {
    Self { transport }
  }

  pub fn transport(&self) -> &T {
    &self.transport
  }

  /// Store (create or replace) a process.
  pub async fn add_process(
    &self,
    process: &Process,
  ) -> Result<Option<serde_json::Value>, ClientError> {
    let path = Endpoint::Processes.path(process.key());
    tracing::info!(process = %process.key(), "storing process");
    self
      .transport
      .request(&path, Verb::Put, Some(process.to_value()?))
      .await
  }

  /// Fetch a process and decode it into `context`.
  pub async fn get_process<'c>(
    &self,
    key: &Key,
    context: &'c mut DecodeContext,
  ) -> Result<&'c mut Process, ClientError> {
    let path = Endpoint::Processes.path(key);
    let value = self.fetch(&path).await?;
    Ok(context.decode_process_value(value)?)
  }

  pub async fn delete_process(&self, key: &Key) -> Result<(), ClientError> {
    let path = Endpoint::Processes.path(key);
    tracing::info!(process = %key, "deleting process");
    self.transport.request(&path, Verb::Delete, None).await?;
    Ok(())
  }

  /// Store (create or replace) a team.
  pub async fn add_team(&self, team: &Team) -> Result<Option<serde_json::Value>, ClientError> {
    let path = Endpoint::Teams.path(team.key());
    tracing::info!(team = %team.key(), "storing team");
    self
      .transport
      .request(&path, Verb::Put, Some(team.to_value()?))
      .await
  }

  /// Fetch a team and register it in `context`.
  pub async fn get_team<'c>(
    &self,
    key: &Key,
    context: &'c mut DecodeContext,
  ) -> Result<&'c Team, ClientError> {
    let path = Endpoint::Teams.path(key);
    let value = self.fetch(&path).await?;
    Ok(context.decode_team_value(value)?)
  }

  pub async fn delete_team(&self, key: &Key) -> Result<(), ClientError> {
    let path = Endpoint::Teams.path(key);
    tracing::info!(team = %key, "deleting team");
    self.transport.request(&path, Verb::Delete, None).await?;
    Ok(())
  }

  /// Fetch a workflow request record. The document is returned as is.
  pub async fn get_request(&self, key: &Key) -> Result<serde_json::Value, ClientError> {
    let path = Endpoint::Requests.path(key);
    self.fetch(&path).await
  }

  async fn fetch(&self, path: &str) -> Result<serde_json::Value, ClientError> {
    self
      .transport
      .request(path, Verb::Get, None)
      .await?
      .ok_or_else(|| ClientError::EmptyBody {
        path: path.to_string(),
      })
  }
}
