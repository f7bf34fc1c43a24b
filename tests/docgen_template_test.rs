use anyhow::Result;
use apigee_client::{DocGenTemplates, OrgConfig, RestResourceClient, TemplateType};
use httpmock::prelude::*;

fn docgen_for(server: &MockServer) -> Result<DocGenTemplates<RestResourceClient>> {
    let config = OrgConfig::new(server.url("/v1"), "acme").with_bearer_token("tok-1");
    let client = RestResourceClient::from_config(&config)?;
    Ok(DocGenTemplates::new(client, "acme"))
}

#[tokio::test]
async fn test_fetch_index_and_operation_templates() -> Result<()> {
    let server = MockServer::start();
    let index_mock = server.mock(|when, then| {
        when.method(GET)
            .path("/v1/o/acme/apimodels/petstore/templates/drupal-cms")
            .query_param("type", "index")
            .header("accept", "text/html")
            .header("authorization", "Bearer tok-1");
        then.status(200)
            .header("Content-Type", "text/html")
            .body("<h1>{{ api.name }}</h1>");
    });
    let method_mock = server.mock(|when, then| {
        when.method(GET)
            .path("/v1/o/acme/apimodels/petstore/templates/drupal-cms")
            .query_param("type", "method");
        then.status(200).body("<h2>{{ method.name }}</h2>");
    });

    let docgen = docgen_for(&server)?;
    let index = docgen.index_template("petstore").await?;
    let operation = docgen.operation_template("petstore").await?;

    index_mock.assert();
    method_mock.assert();
    assert_eq!(index, "<h1>{{ api.name }}</h1>");
    assert_eq!(operation, "<h2>{{ method.name }}</h2>");
    Ok(())
}

#[tokio::test]
async fn test_save_then_update_template() -> Result<()> {
    let server = MockServer::start();
    let save_mock = server.mock(|when, then| {
        when.method(POST)
            .path("/v1/o/acme/apimodels/petstore/templates")
            .query_param("type", "index")
            .query_param("name", "drupal-cms")
            .header("content-type", "text/html")
            .body("<p>v1</p>");
        then.status(201).body("<p>v1</p>");
    });
    let update_mock = server.mock(|when, then| {
        when.method(PUT)
            .path("/v1/o/acme/apimodels/petstore/templates/drupal-cms")
            .query_param("type", "method")
            .header("content-type", "text/html")
            .body("<p>v2</p>");
        then.status(200).body("<p>v2</p>");
    });

    let docgen = docgen_for(&server)?;
    let saved = docgen.save_template("petstore", TemplateType::Index, "<p>v1</p>").await?;
    let updated = docgen.update_template("petstore", TemplateType::Method, "<p>v2</p>").await?;

    save_mock.assert();
    update_mock.assert();
    assert_eq!(saved, "<p>v1</p>");
    assert_eq!(updated, "<p>v2</p>");
    Ok(())
}

#[tokio::test]
async fn test_missing_model_is_api_error() -> Result<()> {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/v1/o/acme/apimodels/unknown/templates/drupal-cms");
        then.status(404).body("<html>Not found</html>");
    });

    let docgen = docgen_for(&server)?;
    let err = docgen.index_template("unknown").await.unwrap_err();

    assert_eq!(err.status(), Some(404));
    Ok(())
}
