use stepwise_graph::Key;

/// Remote resources addressed by key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
  Processes,
  Teams,
  Requests,
}

impl Endpoint {
  /// Resource path relative to the base URI, e.g. `processes/<key>.json`.
  pub fn path(&self, key: &Key) -> String {
    let collection = match self {
      Endpoint::Processes => "processes",
      Endpoint::Teams => "teams",
      Endpoint::Requests => "requests",
    };
    format!("{}/{}.json", collection, key)
  }
}
