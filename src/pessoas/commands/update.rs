use crate::api::ApiClient;
use crate::commands::{reload_after_mutation, CmdMessage, CmdResult};
use crate::error::Result;
use crate::model::{Envelope, Person, PersonInput};
use crate::transport::Transport;

pub const SUCCESS_MESSAGE: &str = "Pessoa atualizada com sucesso!";

/// `PUT {base}/{id}`, then reload.
pub async fn run<T: Transport>(
    api: &ApiClient<T>,
    id: u64,
    input: &PersonInput,
) -> Result<CmdResult> {
    // The record in the reply is informational; an empty body still counts
    // as success and the reload below fetches the real state.
    let envelope: Option<Envelope<Person>> = api
        .put_as(&api.item_path(id), serde_json::to_value(input)?)
        .await?;

    let mut result = CmdResult::default();
    if let Some(person) = envelope.and_then(|e| e.data) {
        result = result.with_person(person);
    }
    result.add_message(CmdMessage::success(SUCCESS_MESSAGE));
    Ok(reload_after_mutation(api, result).await)
}
