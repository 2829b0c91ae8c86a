use crate::api::ApiClient;
use crate::commands::CmdResult;
use crate::error::{PessoasError, Result};
use crate::model::{Envelope, Person};
use crate::transport::Transport;

/// `GET {base}/{id}`.
pub async fn run<T: Transport>(api: &ApiClient<T>, id: u64) -> Result<CmdResult> {
    let envelope: Envelope<Person> = api.get_as(&api.item_path(id)).await?;
    let person = envelope
        .data
        .ok_or_else(|| PessoasError::api(404, envelope.message))?;
    Ok(CmdResult::default().with_person(person))
}
