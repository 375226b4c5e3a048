//! Account-level handle: table management.

use std::sync::Arc;

use rustdynamo_auth::Credentials;
use rustdynamo_model::input::{
    CreateTableInput, DeleteTableInput, DescribeTableInput, ListTablesInput,
};
use rustdynamo_model::output::{
    CreateTableOutput, DeleteTableOutput, DescribeTableOutput, ListTablesOutput,
};
use rustdynamo_model::types::TableStatus;
use rustdynamo_model::{DynamoDBOperation, PrimaryKey, TableDescription};
use tracing::debug;

use crate::config::{CallOptions, ClientConfig, Region};
use crate::error::ClientError;
use crate::executor::Executor;
use crate::request::endpoint_uri;
use crate::table::Table;
use crate::transport::{HttpTransport, HyperTransport};

/// A handle to the service in one region with one set of credentials.
///
/// Cloning is cheap; clones share the same executor.
#[derive(Debug, Clone)]
pub struct Server {
    executor: Arc<Executor>,
    options: CallOptions,
}

impl Server {
    /// Connect over plain HTTP with [`HyperTransport`], e.g. to DynamoDB Local.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidEndpoint`] if the endpoint is not an
    /// `http://` URL.
    pub fn new(credentials: Credentials, region: Region) -> Result<Self, ClientError> {
        let uri = endpoint_uri(&region.endpoint)?;
        if uri.scheme_str() != Some("http") {
            return Err(ClientError::InvalidEndpoint {
                endpoint: region.endpoint,
                reason: "the built-in transport only speaks plain HTTP; supply a TLS transport"
                    .to_owned(),
            });
        }
        Self::with_transport(
            Arc::new(HyperTransport::new()),
            credentials,
            region,
            ClientConfig::from_env(),
        )
    }

    /// Build a server from `AWS_*` and `DYNAMODB_*` environment variables
    /// using the built-in transport.
    pub fn from_env() -> Result<Self, ClientError> {
        Self::new(Credentials::from_env()?, Region::from_env())
    }

    /// Use a custom transport and configuration.
    pub fn with_transport(
        transport: Arc<dyn HttpTransport>,
        credentials: Credentials,
        region: Region,
        config: ClientConfig,
    ) -> Result<Self, ClientError> {
        endpoint_uri(&region.endpoint)?;
        Ok(Self::from_executor(Arc::new(Executor::new(
            transport,
            credentials,
            region,
            config,
        ))))
    }

    /// Wrap an existing executor.
    #[must_use]
    pub fn from_executor(executor: Arc<Executor>) -> Self {
        Self {
            executor,
            options: CallOptions::default(),
        }
    }

    /// A copy of this handle whose calls use `options`.
    #[must_use]
    pub fn with_options(&self, options: CallOptions) -> Self {
        Self {
            executor: Arc::clone(&self.executor),
            options,
        }
    }

    /// Per-call options applied to every call made through this handle.
    #[must_use]
    pub fn options(&self) -> &CallOptions {
        &self.options
    }

    /// The region this handle talks to.
    #[must_use]
    pub fn region(&self) -> &Region {
        self.executor.region()
    }

    /// A handle to an existing table with a known key schema.
    #[must_use]
    pub fn table(&self, name: impl Into<String>, primary_key: PrimaryKey) -> Table {
        Table::new(self.clone(), name, primary_key)
    }

    /// A handle to the table a descriptor names, keyed by its key schema.
    pub fn table_from_description(&self, desc: &TableDescription) -> Result<Table, ClientError> {
        Ok(self.table(&desc.table_name, desc.primary_key()?))
    }

    pub(crate) async fn call<I, O>(
        &self,
        operation: DynamoDBOperation,
        input: &I,
    ) -> Result<O, ClientError>
    where
        I: serde::Serialize + ?Sized,
        O: serde::de::DeserializeOwned,
    {
        self.executor.execute(operation, input, &self.options).await
    }

    /// Create a table and return the status the service reports, usually
    /// `CREATING`.
    pub async fn create_table(&self, desc: &TableDescription) -> Result<TableStatus, ClientError> {
        let output: CreateTableOutput = self
            .call(DynamoDBOperation::CreateTable, &CreateTableInput::from(desc))
            .await?;
        let status = reported_status(DynamoDBOperation::CreateTable, output.table_description)?;
        debug!(table = %desc.table_name, status = %status, "created table");
        Ok(status)
    }

    /// Delete the table named by `desc`. Only the name is used.
    pub async fn delete_table(&self, desc: &TableDescription) -> Result<TableStatus, ClientError> {
        let input = DeleteTableInput {
            table_name: desc.table_name.clone(),
        };
        let output: DeleteTableOutput = self.call(DynamoDBOperation::DeleteTable, &input).await?;
        let status = reported_status(DynamoDBOperation::DeleteTable, output.table_description)?;
        debug!(table = %desc.table_name, status = %status, "deleted table");
        Ok(status)
    }

    /// Fetch the current description of a table. Never cached.
    pub async fn describe_table(&self, name: &str) -> Result<TableDescription, ClientError> {
        let input = DescribeTableInput {
            table_name: name.to_owned(),
        };
        let output: DescribeTableOutput =
            self.call(DynamoDBOperation::DescribeTable, &input).await?;
        output.table.ok_or(ClientError::MalformedResponse {
            operation: DynamoDBOperation::DescribeTable.as_str(),
            reason: "missing Table".to_owned(),
        })
    }

    /// List all table names, following pagination to the end.
    pub async fn list_tables(&self) -> Result<Vec<String>, ClientError> {
        let mut names = Vec::new();
        let mut start: Option<String> = None;
        loop {
            let page = self.list_tables_page(start.as_deref(), None).await?;
            names.extend(page.table_names);
            match page.last_evaluated_table_name {
                // A repeated cursor would loop forever.
                Some(next) if start.as_deref() != Some(next.as_str()) => start = Some(next),
                _ => return Ok(names),
            }
        }
    }

    /// Fetch one page of table names.
    pub async fn list_tables_page(
        &self,
        exclusive_start_table_name: Option<&str>,
        limit: Option<u32>,
    ) -> Result<ListTablesOutput, ClientError> {
        let input = ListTablesInput {
            exclusive_start_table_name: exclusive_start_table_name.map(ToOwned::to_owned),
            limit,
        };
        self.call(DynamoDBOperation::ListTables, &input).await
    }
}

fn reported_status(
    operation: DynamoDBOperation,
    desc: Option<TableDescription>,
) -> Result<TableStatus, ClientError> {
    desc.and_then(|d| d.table_status)
        .ok_or(ClientError::MalformedResponse {
            operation: operation.as_str(),
            reason: "missing TableDescription.TableStatus".to_owned(),
        })
}
