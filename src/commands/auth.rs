use tracing::info;

use crate::client::JiraClient;
use crate::error::Result;
use crate::output;
use crate::types::User;

pub async fn myself(client: &JiraClient) -> Result<User> {
    client.get("/rest/api/3/myself", &[]).await
}

pub async fn check(client: &JiraClient) -> Result<()> {
    let user = myself(client).await?;
    info!(account_id = %user.account_id, "credentials accepted");

    output::print_message(&format!(
        "Authenticated to {} as {}{}",
        client.site(),
        user.display_name,
        user.email_address
            .map(|e| format!(" <{e}>"))
            .unwrap_or_default()
    ));

    Ok(())
}
