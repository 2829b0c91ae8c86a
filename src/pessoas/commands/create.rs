use crate::api::ApiClient;
use crate::commands::{reload_after_mutation, CmdMessage, CmdResult};
use crate::error::Result;
use crate::model::{Envelope, Person, PersonInput};
use crate::transport::Transport;

pub const SUCCESS_MESSAGE: &str = "Pessoa criada com sucesso!";

/// `POST {base}`, then reload.
pub async fn run<T: Transport>(api: &ApiClient<T>, input: &PersonInput) -> Result<CmdResult> {
    // The record in the reply is informational; an empty body still counts
    // as success and the reload below fetches the real state.
    let envelope: Option<Envelope<Person>> = api
        .post_as(&api.collection_path(), serde_json::to_value(input)?)
        .await?;

    let mut result = CmdResult::default();
    if let Some(person) = envelope.and_then(|e| e.data) {
        result = result.with_person(person);
    }
    result.add_message(CmdMessage::success(SUCCESS_MESSAGE));
    Ok(reload_after_mutation(api, result).await)
}
