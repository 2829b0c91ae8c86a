use crate::api::ApiClient;
use crate::commands::{reload_after_mutation, CmdMessage, CmdResult};
use crate::error::Result;
use crate::transport::Transport;

pub const SUCCESS_MESSAGE: &str = "Pessoa excluída com sucesso!";

/// `DELETE {base}/{id}`, then reload. No response body is required.
pub async fn run<T: Transport>(api: &ApiClient<T>, id: u64) -> Result<CmdResult> {
    api.delete(&api.item_path(id)).await?;

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(SUCCESS_MESSAGE));
    Ok(reload_after_mutation(api, result).await)
}
