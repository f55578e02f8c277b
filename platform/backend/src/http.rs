use async_trait::async_trait;
use reqwest::{Method, RequestBuilder};
use serde::{Serialize, de::DeserializeOwned};
use tracing::debug;
use url::Url;

use crate::{
    BackendError, BackendSettings, BatchResponse, QueryParams, QueryResponse, Record, RecordId,
    RecordResponse, RecordsClient,
};

pub const PUBLIC_KEY_HEADER: &str = "X-Apper-Public-Key";

/// [`RecordsClient`] speaking JSON over HTTPS to the hosted backend.
#[derive(Clone, Debug)]
pub struct HttpRecordsClient {
    http: reqwest::Client,
    settings: BackendSettings,
}

#[derive(Serialize)]
struct RecordsBody {
    records: Vec<Record>,
}

#[derive(Serialize)]
struct DeleteBody {
    #[serde(rename = "RecordIds")]
    record_ids: Vec<RecordId>,
}

impl HttpRecordsClient {
    pub fn new(settings: BackendSettings) -> Result<Self, BackendError> {
        let http = reqwest::Client::builder()
            .timeout(settings.timeout)
            .build()?;
        Ok(Self { http, settings })
    }

    /// `{base}/projects/{project}/tables/{table}/records[/extra..]`
    fn records_url(&self, table: &str, extra: &[&str]) -> Result<Url, BackendError> {
        let mut url = self.settings.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| BackendError::Unavailable("base url cannot carry a path".into()))?
            .pop_if_empty()
            .extend([
                "projects",
                self.settings.project_id.as_str(),
                "tables",
                table,
                "records",
            ])
            .extend(extra);
        Ok(url)
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        self.http
            .request(method, url)
            .header(PUBLIC_KEY_HEADER, &self.settings.public_key)
    }

    async fn send<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        operation: &'static str,
        table: &str,
    ) -> Result<T, BackendError> {
        debug!(operation, table, "dispatching backend request");
        let response = request.send().await?;
        let status = response.status();
        let body = response.bytes().await?;
        if !status.is_success() {
            debug!(operation, table, status = status.as_u16(), "backend rejected request");
            return Err(BackendError::from_response(status.as_u16(), &body));
        }
        Ok(serde_json::from_slice(&body)?)
    }
}

#[async_trait]
impl RecordsClient for HttpRecordsClient {
    async fn fetch_records(
        &self,
        table: &str,
        params: &QueryParams,
    ) -> Result<QueryResponse, BackendError> {
        let url = self.records_url(table, &["query"])?;
        self.send(self.request(Method::POST, url).json(params), "fetchRecords", table)
            .await
    }

    async fn get_record_by_id(
        &self,
        table: &str,
        id: RecordId,
        params: &QueryParams,
    ) -> Result<RecordResponse, BackendError> {
        let id = id.to_string();
        let url = self.records_url(table, &[id.as_str(), "query"])?;
        self.send(self.request(Method::POST, url).json(params), "getRecordById", table)
            .await
    }

    async fn create_records(
        &self,
        table: &str,
        records: Vec<Record>,
    ) -> Result<BatchResponse, BackendError> {
        let url = self.records_url(table, &[])?;
        let body = RecordsBody { records };
        self.send(self.request(Method::POST, url).json(&body), "createRecord", table)
            .await
    }

    async fn update_records(
        &self,
        table: &str,
        records: Vec<Record>,
    ) -> Result<BatchResponse, BackendError> {
        let url = self.records_url(table, &[])?;
        let body = RecordsBody { records };
        self.send(self.request(Method::PUT, url).json(&body), "updateRecord", table)
            .await
    }

    async fn delete_records(
        &self,
        table: &str,
        ids: Vec<RecordId>,
    ) -> Result<BatchResponse, BackendError> {
        let url = self.records_url(table, &[])?;
        let body = DeleteBody { record_ids: ids };
        self.send(self.request(Method::DELETE, url).json(&body), "deleteRecord", table)
            .await
    }
}
