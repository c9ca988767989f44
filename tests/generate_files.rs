//! Integration test: generate a client library and write it to disk.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use sharpgen::{GeneratorConfig, generate, write_files};

const SCHEMA_JSON: &str = r##"{
  "openapi": "3.1.0",
  "paths": {
    "/notes/create": {
      "post": {
        "operationId": "notes/create",
        "security": [{ "bearerAuth": [] }],
        "requestBody": {
          "content": { "application/json": { "schema": { "properties": {
            "text": { "type": "string" }
          } } } }
        },
        "responses": {
          "200": { "content": { "application/json": { "schema": { "$ref": "#/components/schemas/Note" } } } }
        }
      }
    }
  },
  "components": { "schemas": {
    "Note": {
      "type": "object",
      "properties": {
        "id": { "type": "string" },
        "tags": { "type": "array", "items": { "type": "string" } }
      }
    }
  } }
}"##;

fn main_config() -> GeneratorConfig {
    GeneratorConfig::default()
}

#[test]
fn generates_and_writes_files() {
    let generation = generate(SCHEMA_JSON, &main_config()).unwrap();
    assert!(generation.failures.is_empty());

    let dir = tempfile::tempdir().unwrap();
    write_files(dir.path(), &generation.files).unwrap();

    let note = std::fs::read_to_string(dir.path().join("Models/Note.cs")).unwrap();
    assert!(note.contains("public class Note {"));
    assert!(note.contains("public string Id { get; set; }"));
    assert!(note.contains("public List<string> Tags { get; set; }"));
    assert!(note.contains("sb.Append(\"class Note: {\\n\");"));

    let client = std::fs::read_to_string(dir.path().join("Controls/NotesApi.cs")).unwrap();
    assert!(client.contains("public async Task<Response<Note>> Create(string text)"));
    assert!(client.contains("await _app.Request<Note>(\"notes/create\", param, true, 200);"));

    let apps = std::fs::read_to_string(dir.path().join("Apps.cs")).unwrap();
    assert!(apps.contains("NotesApi = new NotesApi(app);"));
}

#[test]
fn write_is_idempotent() {
    let generation = generate(SCHEMA_JSON, &main_config()).unwrap();
    let dir = tempfile::tempdir().unwrap();
    write_files(dir.path(), &generation.files).unwrap();
    write_files(dir.path(), &generation.files).unwrap();
    assert!(dir.path().join("Models/Note.cs").exists());
}
