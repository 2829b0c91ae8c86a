use crate::api::ApiClient;
use crate::commands::CmdResult;
use crate::error::Result;
use crate::model::{Envelope, Person};
use crate::transport::Transport;

pub async fn run<T: Transport>(api: &ApiClient<T>) -> Result<CmdResult> {
    let people = fetch(api).await?;
    Ok(CmdResult::default().with_people(people))
}

/// `GET {base}`. A response without `data`, or without a body at all, is an
/// empty collection.
pub async fn fetch<T: Transport>(api: &ApiClient<T>) -> Result<Vec<Person>> {
    let envelope: Option<Envelope<Vec<Person>>> = api.get_as(&api.collection_path()).await?;
    Ok(envelope.and_then(|e| e.data).unwrap_or_default())
}
