use flightsurety::domain::airline::Airline;
use flightsurety::domain::ports::{ChangeSet, LedgerStoreBox};
use flightsurety::infrastructure::in_memory::InMemoryLedgerStore;

#[tokio::test]
async fn test_store_as_trait_object() {
    let store: LedgerStoreBox = Box::new(InMemoryLedgerStore::new());

    // Verify Send + Sync by spawning a task
    let handle = tokio::spawn(async move {
        store
            .commit(ChangeSet {
                airlines: vec![Airline::genesis("0xa1".into(), "Genesis Air")],
                ..ChangeSet::default()
            })
            .await
            .unwrap();
        store.airline(&"0xa1".into()).await.unwrap().unwrap()
    });

    let retrieved = handle.await.unwrap();
    assert_eq!(retrieved.name, "Genesis Air");
    assert!(retrieved.registered);
}

#[tokio::test]
async fn test_app_shared_across_tasks() {
    use flightsurety::application::app::SuretyApp;
    use rust_decimal_macros::dec;
    use std::sync::Arc;

    let app = Arc::new(
        SuretyApp::deploy(
            Box::new(InMemoryLedgerStore::new()),
            flightsurety::config::SuretyConfig::default(),
        )
        .await
        .unwrap(),
    );

    let mut handles = Vec::new();
    for i in 0..20 {
        let app = app.clone();
        handles.push(tokio::spawn(async move {
            app.fund_airline_insurance(dec!(1), &format!("0xf{}", i % 4).into())
                .await
                .unwrap()
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }

    // Serialized calls: no funding update is lost.
    for i in 0..4 {
        let airline = app.airline(&format!("0xf{i}").into()).await.unwrap().unwrap();
        assert_eq!(airline.funded_amount.0, dec!(5));
        assert!(!airline.funded);
    }
}
