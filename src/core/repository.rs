use crate::domain::hydrate::{hydrate_value, HydrationReport};
use crate::domain::model::{Body, ContentType, HttpMethod, RequestOptions, ResourcePath, ResourceRequest};
use crate::domain::ports::{Model, ResourceTransport};
use crate::domain::record::Record;
use crate::domain::schema::json_type_name;
use crate::utils::error::{ApigeeError, Result};
use serde_json::Value;
use std::marker::PhantomData;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SaveMode {
    Create,
    Update,
    /// Update when the model carries an id, create otherwise.
    #[default]
    Auto,
}

/// Load/list/save of one model kind within an organization.
pub struct ModelRepository<M: Model, T: ResourceTransport> {
    transport: T,
    collection: ResourcePath,
    _model: PhantomData<fn() -> M>,
}

impl<M: Model, T: ResourceTransport> ModelRepository<M, T> {
    pub fn new(transport: T, org_name: &str) -> Self {
        Self::with_collection(transport, M::collection_path(org_name))
    }

    pub fn with_collection(transport: T, collection: ResourcePath) -> Self {
        Self {
            transport,
            collection,
            _model: PhantomData,
        }
    }

    pub fn collection(&self) -> &ResourcePath {
        &self.collection
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    fn options(&self) -> RequestOptions {
        RequestOptions::default().with_base_path(self.collection.clone())
    }

    fn endpoint_hint(&self, path: &ResourcePath) -> String {
        self.collection.join(path).to_string()
    }

    fn hydrate_model(&self, raw: &Value) -> Result<M> {
        let mut record = Record::new(M::schema());
        let report: HydrationReport = hydrate_value(&mut record, raw, true)?;
        if !report.is_clean() {
            tracing::debug!(kind = record.kind(), skipped = ?report.skipped, "Ignored unknown properties");
        }
        Ok(M::from_record(record))
    }

    pub async fn load(&self, id: &str) -> Result<M> {
        let path = ResourcePath::root().segment(id);
        let request = ResourceRequest::get(path.clone(), ContentType::Json).options(self.options());
        let body = self.transport.execute(request).await?;

        match body {
            Body::Json(value @ Value::Object(_)) => self.hydrate_model(&value),
            other => Err(unexpected_shape(&self.endpoint_hint(&path), "object", &other)),
        }
    }

    pub async fn list(&self) -> Result<Vec<M>> {
        self.list_with(RequestOptions::default()).await
    }

    /// Lists the collection with extra query parameters.
    pub async fn list_with(&self, options: RequestOptions) -> Result<Vec<M>> {
        let mut merged = self.options();
        merged.query = options.query;
        if let Some(base) = options.base_path {
            merged.base_path = Some(base);
        }

        let request = ResourceRequest::get(ResourcePath::root(), ContentType::Json).options(merged);
        let body = self.transport.execute(request).await?;
        let endpoint = self.endpoint_hint(&ResourcePath::root());

        let items = match body {
            Body::Json(Value::Array(items)) => items,
            Body::Json(Value::Object(mut wrapper)) => match wrapper.remove(M::WRAPPER_TAG) {
                Some(Value::Array(items)) => items,
                Some(single @ Value::Object(_)) => vec![single],
                None | Some(Value::Null) => Vec::new(),
                Some(other) => {
                    return Err(unexpected_shape(&endpoint, "array", &Body::Json(other)))
                }
            },
            Body::Json(Value::Null) => Vec::new(),
            other => return Err(unexpected_shape(&endpoint, "array", &other)),
        };

        let models = items
            .iter()
            .map(|item| match item {
                Value::Object(_) => self.hydrate_model(item),
                other => Err(unexpected_shape(&endpoint, "object item", &Body::Json(other.clone()))),
            })
            .collect::<Result<Vec<M>>>()?;
        tracing::debug!(count = models.len(), collection = %self.collection, "Listed models");
        Ok(models)
    }

    /// Sends the model's mapping and returns the server's view of it.
    pub async fn save(&self, model: &M, mode: SaveMode) -> Result<M> {
        let id = model.id().map(str::to_string);
        let create = match mode {
            SaveMode::Create => true,
            SaveMode::Update => false,
            SaveMode::Auto => id.is_none(),
        };

        let (method, path) = if create {
            if !M::ID_IS_AUTOGENERATED && id.is_none() {
                return Err(ApigeeError::validation(
                    M::ID_FIELD,
                    "null",
                    format!("{} ids are not generated by the server", model.record().kind()),
                ));
            }
            (HttpMethod::Post, ResourcePath::root())
        } else {
            let id = id.ok_or_else(|| {
                ApigeeError::validation(M::ID_FIELD, "null", "an id is required to update")
            })?;
            (HttpMethod::Put, ResourcePath::root().segment(id))
        };

        let payload = Body::Json(Value::Object(model.record().to_mapping()));
        let request = ResourceRequest::with_body(method, path.clone(), payload, ContentType::Json, ContentType::Json)
            .options(self.options());

        tracing::info!(kind = model.record().kind(), %method, "Saving model");
        match self.transport.execute(request).await? {
            Body::Json(value @ Value::Object(_)) => self.hydrate_model(&value),
            Body::Json(Value::Null) => Ok(M::from_record(model.record().clone())),
            other => Err(unexpected_shape(&self.endpoint_hint(&path), "object", &other)),
        }
    }
}

fn unexpected_shape(endpoint: &str, expected: &str, body: &Body) -> ApigeeError {
    let found = match body {
        Body::Json(value) => json_type_name(value),
        Body::Text(_) => "text",
    };
    ApigeeError::FormatError {
        endpoint: endpoint.to_string(),
        message: format!("expected {} in response, got {}", expected, found),
    }
}
