use std::time::Duration;

use reqwest::Client;
use tokio::time::sleep;

use crate::err::SwampError;
use crate::weather::{GridDocument, PointDocument};

pub const POINTS_URL: &str = "https://api.weather.gov/points";

pub fn client(user_agent: &str) -> Result<Client, SwampError> {
    Ok(Client::builder().user_agent(user_agent).build()?)
}

async fn get(client: &Client, url: &str) -> Result<String, SwampError> {
    tracing::debug!("GET {url}");
    Ok(client
        .get(url)
        .send()
        .await?
        .error_for_status()?
        .text()
        .await?)
}

pub async fn fetch_grid(client: &Client, url: &str) -> Result<GridDocument, SwampError> {
    GridDocument::parse(&get(client, url).await?)
}

/// One attempt, then one more after `delay`.
pub async fn fetch_with_retry(
    client: &Client,
    url: &str,
    delay: Duration,
) -> Result<GridDocument, SwampError> {
    match fetch_grid(client, url).await {
        Ok(doc) => Ok(doc),
        Err(e) => {
            tracing::warn!("cannot fetch {url}: {e}, retrying in {}s", delay.as_secs());
            sleep(delay).await;
            let doc = fetch_grid(client, url).await?;
            tracing::info!("fetched {url} on retry");
            Ok(doc)
        }
    }
}

/// Grid forecast URL for a location. Be kind to weather.gov, this does not
/// change: resolve it once and keep it in the settings.
pub async fn grid_url(client: &Client, lat: f64, lon: f64) -> Result<String, SwampError> {
    let body = get(client, &format!("{POINTS_URL}/{lat},{lon}")).await?;
    let point: PointDocument = serde_json::from_str(&body)?;
    Ok(point.properties.forecast_grid_data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    #[tokio::test]
    async fn gives_up_after_one_retry() {
        let client = client("swampcool tests").unwrap();
        let delay = Duration::from_millis(200);
        let begin = Instant::now();
        // discard port, nothing listens there
        let res = fetch_with_retry(&client, "http://127.0.0.1:9/gridpoints", delay).await;
        assert!(matches!(res, Err(SwampError::Http(_))));
        assert!(begin.elapsed() >= delay);
    }
}
