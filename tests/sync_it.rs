// std
use std::{
	io::{self, Write},
	sync::Arc,
};
// crates.io
use httpmock::prelude::*;
use parking_lot::Mutex;
use serde_json::{Value, json};
// self
use datadog_usage_tap::{
	auth::ApiSecret,
	config::TapConfig,
	cursor::{HourStamp, MonthStamp},
	http::UsageClient,
	schema::{SchemaSet, StreamSchema},
	sink::JsonLinesSink,
	state::{MemoryStore, TapState},
	stream::{CURSOR_FIELD, Stream},
	sync::Syncer,
};

/// Writer handle that keeps the emitted bytes readable after the sink is
/// handed to the syncer behind an `Arc`.
#[derive(Clone, Default)]
struct SharedBuf(Arc<Mutex<Vec<u8>>>);
impl SharedBuf {
	fn lines(&self) -> Vec<Value> {
		String::from_utf8(self.0.lock().clone())
			.expect("Sink output should be UTF-8.")
			.lines()
			.map(|line| serde_json::from_str(line).expect("Each sink line should be valid JSON."))
			.collect()
	}
}
impl Write for SharedBuf {
	fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
		self.0.lock().extend_from_slice(buf);

		Ok(buf.len())
	}

	fn flush(&mut self) -> io::Result<()> {
		Ok(())
	}
}

fn build_config() -> TapConfig {
	TapConfig {
		api_key: ApiSecret::new("111"),
		application_key: ApiSecret::new("222"),
		start_hour: HourStamp::new("2019-08-07T12").expect("Start-hour fixture should be valid."),
		start_month: MonthStamp::new("2019-07").expect("Start-month fixture should be valid."),
	}
}

fn build_schemas() -> SchemaSet {
	let mut schemas = SchemaSet::default();

	for stream in Stream::ALL {
		schemas.insert(
			stream,
			StreamSchema::new(json!({ "type": ["null", "object"], "properties": {} })),
		);
	}

	schemas
}

fn build_syncer(server: &MockServer) -> (Syncer, Arc<MemoryStore>, SharedBuf) {
	let credentials = build_config().credentials();
	let client = UsageClient::with_base_url(credentials, server.url("/api/v1/usage/"))
		.expect("Client should build against the mock endpoint.");
	let store = Arc::new(MemoryStore::default());
	let buf = SharedBuf::default();
	let sink = Arc::new(JsonLinesSink::new(buf.clone()));
	let syncer = Syncer::new(client, store.clone(), sink, build_config());

	(syncer, store, buf)
}

#[tokio::test]
async fn logs_sync_writes_schema_then_record_lines() {
	let server = MockServer::start_async().await;
	let record =
		json!({ "ingested_events_bytes": 0, "indexed_events_count": 0, "hour": "2019-07-22T18" });
	let page = json!({ "usage": [record.clone()] });
	let mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/api/v1/usage/logs").query_param("start_hr", "2019-08-07T12");
			then.status(200).header("content-type", "application/json").json_body(page);
		})
		.await;
	let (syncer, store, buf) = build_syncer(&server);
	let schemas = build_schemas();
	let schema = schemas.get(Stream::Logs).expect("Logs schema fixture should be present.");
	let before = HourStamp::now_utc();
	let state = syncer
		.sync_stream(TapState::default(), Stream::Logs, schema)
		.await
		.expect("Logs sync should succeed.");
	let after = HourStamp::now_utc();
	let lines = buf.lines();

	assert_eq!(lines.len(), 2);
	assert_eq!(lines[0]["type"], "SCHEMA");
	assert_eq!(lines[0]["stream"], "logs");
	assert_eq!(lines[0]["key_properties"], json!(["hour"]));
	assert_eq!(lines[1]["type"], "RECORD");
	assert_eq!(lines[1]["stream"], "logs");
	assert_eq!(lines[1]["record"], record);

	let bookmark = state
		.bookmark(Stream::Logs, CURSOR_FIELD)
		.expect("Successful sync should record a bookmark.");

	assert!(
		bookmark == before.as_ref() || bookmark == after.as_ref(),
		"Bookmark `{bookmark}` should equal the run's current UTC hour.",
	);
	assert_eq!(store.snapshot(), state);

	mock.assert_async().await;
}

#[tokio::test]
async fn records_are_emitted_in_page_order() {
	let server = MockServer::start_async().await;
	let first = json!({ "tasks_count": 1, "hour": "2019-06-17T12" });
	let second = json!({ "tasks_count": 2, "hour": "2019-06-17T13" });
	let page = json!({ "usage": [first.clone(), second.clone()] });
	let mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/api/v1/usage/fargate");
			then.status(200).header("content-type", "application/json").json_body(page);
		})
		.await;
	let (syncer, _store, buf) = build_syncer(&server);
	let schemas = build_schemas();

	syncer
		.sync_stream(
			TapState::default(),
			Stream::Fargate,
			schemas.get(Stream::Fargate).expect("Fargate schema fixture should be present."),
		)
		.await
		.expect("Fargate sync should succeed.");

	let records: Vec<_> = buf
		.lines()
		.into_iter()
		.filter(|line| line["type"] == "RECORD")
		.map(|line| line["record"].clone())
		.collect();

	assert_eq!(records, vec![first, second]);

	mock.assert_async().await;
}

#[tokio::test]
async fn sync_all_visits_every_stream_in_order_and_isolates_failures() {
	let server = MockServer::start_async().await;

	// Every stream serves an empty page except hosts, which stays broken.
	for stream in Stream::ALL {
		let status = if stream == Stream::HostsAndContainers { 503 } else { 200 };

		server
			.mock_async(move |when, then| {
				when.method(GET).path(format!("/api/v1/usage/{}", stream.path()));
				then.status(status)
					.header("content-type", "application/json")
					.json_body(json!({ "usage": [] }));
			})
			.await;
	}

	let (syncer, store, buf) = build_syncer(&server);
	let state = syncer
		.sync_all(TapState::default(), &build_schemas())
		.await
		.expect("A single failing stream should not fail the run.");
	let declared: Vec<_> = buf
		.lines()
		.into_iter()
		.filter(|line| line["type"] == "SCHEMA")
		.map(|line| line["stream"].as_str().expect("Stream labels are strings.").to_owned())
		.collect();
	let expected: Vec<_> = Stream::ALL.iter().map(|stream| stream.as_str().to_owned()).collect();

	assert_eq!(declared, expected, "Schemas are declared in stream order.");

	for stream in Stream::ALL {
		let bookmark = state.bookmark(stream, CURSOR_FIELD);

		if stream == Stream::HostsAndContainers {
			assert_eq!(bookmark, None, "The failed stream must not advance.");
		} else {
			assert!(bookmark.is_some(), "Stream `{stream}` should have advanced.");
		}
	}

	assert_eq!(store.snapshot(), state);
}
