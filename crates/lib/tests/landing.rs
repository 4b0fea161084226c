mod common;

use std::time::Duration;

use async_trait::async_trait;
use common::{Canned, FakeRepository, ok};
use serde_json::{Value, json};
use tawseek_misr::{
    Error, GovernmentId, LandingBootstrap, LandingOutcome, OfficeId, Platform, Repository,
    Result, TawseekApi, endpoints,
};
use tokio::sync::Barrier;

fn version(android: u32, ios: u32) -> Canned {
    ok(json!({ "androidVersionCode": android, "iosVersionCode": ios, "versionName": "2.1.0" }))
}

fn offices() -> Canned {
    ok(json!([
        { "orgUnitId": 12, "orgUnitName": "مكتب توثيق مدينة نصر", "governmentId": 1,
          "latitude": 30.05, "longitude": 31.34, "vipFlag": "1" },
        { "orgUnitId": 40, "orgUnitName": "مكتب توثيق سموحة", "governmentId": 2, "vipFlag": "2" }
    ]))
}

fn governments() -> Canned {
    ok(json!([
        { "governmentId": 1, "governmentName": "القاهرة" },
        { "governmentId": 2, "governmentName": "الإسكندرية" }
    ]))
}

#[tokio::test]
async fn ready_with_both_lookups() {
    let repo = FakeRepository::new()
        .with(endpoints::VERSION_CHECK, version(10, 8))
        .with(endpoints::OFFICES, offices())
        .with(endpoints::GOVERNMENTS, governments());
    let api = TawseekApi::new(repo);

    let outcome = LandingBootstrap::new(&api).run(10, Platform::Android).await.unwrap();
    assert_eq!(outcome.offices().len(), 2);
    assert_eq!(outcome.offices()[0].id, OfficeId(12));
    assert_eq!(outcome.governments()[1].id, GovernmentId(2));
}

#[tokio::test]
async fn failed_governments_fetch_leaves_offices_intact() {
    let repo = FakeRepository::new()
        .with(endpoints::VERSION_CHECK, version(10, 8))
        .with(endpoints::OFFICES, offices())
        .with(endpoints::GOVERNMENTS, Canned::Transport("connection reset"));
    let api = TawseekApi::new(repo);

    match LandingBootstrap::new(&api).run(11, Platform::Android).await {
        Ok(LandingOutcome::Ready {
            offices,
            governments,
        }) => {
            assert_eq!(offices.len(), 2);
            assert!(governments.is_empty());
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[tokio::test]
async fn failed_offices_fetch_leaves_governments_intact() {
    let repo = FakeRepository::new()
        .with(endpoints::VERSION_CHECK, version(10, 8))
        .with(endpoints::OFFICES, Canned::Http(503, "unavailable"))
        .with(endpoints::GOVERNMENTS, governments());
    let api = TawseekApi::new(repo);

    let outcome = LandingBootstrap::new(&api).run(10, Platform::Android).await.unwrap();
    assert!(outcome.offices().is_empty());
    assert_eq!(outcome.governments().len(), 2);
}

#[tokio::test]
async fn outdated_build_stops_before_lookups() {
    let repo = FakeRepository::new()
        .with(endpoints::VERSION_CHECK, version(10, 8))
        .with(endpoints::OFFICES, offices())
        .with(endpoints::GOVERNMENTS, governments());
    let api = TawseekApi::new(repo);

    let outcome = LandingBootstrap::new(&api).run(7, Platform::Ios).await.unwrap();
    assert_eq!(
        outcome,
        LandingOutcome::UpdateRequired {
            installed: 7,
            required: 8
        }
    );
    assert!(outcome.offices().is_empty());
    assert!(api.repository().calls_to(endpoints::OFFICES).is_empty());
    assert!(api.repository().calls_to(endpoints::GOVERNMENTS).is_empty());
}

#[tokio::test]
async fn version_check_failure_is_fatal() {
    let repo = FakeRepository::new()
        .with(endpoints::VERSION_CHECK, Canned::Transport("dns failure"))
        .with(endpoints::OFFICES, offices())
        .with(endpoints::GOVERNMENTS, governments());
    let api = TawseekApi::new(repo);

    let err = LandingBootstrap::new(&api)
        .run(10, Platform::Android)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Transport(_)));
}

#[tokio::test]
async fn lookups_are_cached_until_cleared() {
    let repo = FakeRepository::new()
        .with(endpoints::OFFICES, offices())
        .with(endpoints::GOVERNMENTS, governments());
    let api = TawseekApi::new(repo);

    api.offices().await.unwrap();
    api.offices().await.unwrap();
    api.governments().await.unwrap();
    assert_eq!(api.repository().calls_to(endpoints::OFFICES).len(), 1);

    api.clear_cache().await;
    api.offices().await.unwrap();
    api.governments().await.unwrap();
    assert_eq!(api.repository().calls_to(endpoints::OFFICES).len(), 2);
    assert_eq!(api.repository().calls_to(endpoints::GOVERNMENTS).len(), 2);
}

#[tokio::test]
async fn failed_fetch_is_not_cached() {
    let repo = FakeRepository::new().with(endpoints::OFFICES, Canned::Transport("timeout"));
    let api = TawseekApi::new(repo);

    assert!(api.offices().await.is_err());
    api.repository().set(endpoints::OFFICES, offices());
    assert_eq!(api.offices().await.unwrap().len(), 2);
}

/// Holds each lookup response until both lookup requests are in flight.
struct LookupsInLockstep {
    inner: FakeRepository,
    both_requested: Barrier,
}

#[async_trait]
impl Repository for LookupsInLockstep {
    async fn get(&self, path: &str) -> Result<Value> {
        if path == endpoints::OFFICES || path == endpoints::GOVERNMENTS {
            self.both_requested.wait().await;
        }
        self.inner.get(path).await
    }

    async fn post(&self, path: &str, body: Value, authenticated: bool) -> Result<Value> {
        self.inner.post(path, body, authenticated).await
    }
}

#[tokio::test]
async fn lookups_are_fetched_concurrently() {
    let repo = LookupsInLockstep {
        inner: FakeRepository::new()
            .with(endpoints::VERSION_CHECK, version(10, 8))
            .with(endpoints::OFFICES, offices())
            .with(endpoints::GOVERNMENTS, governments()),
        both_requested: Barrier::new(2),
    };
    let api = TawseekApi::new(repo);

    let outcome = tokio::time::timeout(
        Duration::from_secs(5),
        LandingBootstrap::new(&api).run(10, Platform::Android),
    )
    .await
    .expect("offices and governments were requested one after the other")
    .unwrap();
    assert_eq!(outcome.offices().len(), 2);
    assert_eq!(outcome.governments().len(), 2);
}
