use crate::api::ApiClient;
use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::transport::Transport;

pub const SUCCESS_MESSAGE: &str = "Dados exportados para pessoas.csv com sucesso!";

/// `GET {base}/exportar`. The server writes the CSV; nothing is saved locally
/// and the response body is not consumed.
pub async fn run<T: Transport>(api: &ApiClient<T>) -> Result<CmdResult> {
    api.get(&api.export_path()).await?;

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(SUCCESS_MESSAGE));
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::fixtures::{api_with, sample};

    #[tokio::test]
    async fn asks_server_to_export() {
        let api = api_with(sample());
        let result = run(&api).await.unwrap();

        assert_eq!(result.messages, vec![CmdMessage::success(SUCCESS_MESSAGE)]);
        assert!(result.people.is_none());
        let csv = api.transport().exported_csv().unwrap();
        assert!(csv.starts_with("ID,Nome,Idade\n"));
        assert!(csv.contains("2,Bruno,42"));
    }

    #[tokio::test]
    async fn failure_is_raised() {
        let api = api_with(sample());
        api.transport().fail_next(1);
        assert!(run(&api).await.is_err());
        assert!(api.transport().exported_csv().is_none());
    }
}
