use grove::{Database, Driver, Entity, ValueEnum};
use time::Duration;

#[derive(ValueEnum, Default, Debug, Clone, Copy, PartialEq)]
enum Level {
    #[default]
    Low,
    Mid,
    High,
}

#[derive(Entity, Default, Debug, Clone, PartialEq)]
#[table_name("grove_simple")]
struct Simple {
    #[grove(primary_key, not_null)]
    id: Option<i32>,
    #[grove(kind = Varchar60)]
    label: Option<String>,
    #[grove(kind = Int12, not_null)]
    amount: i64,
    #[grove(kind = Double)]
    ratio: Option<f64>,
    #[grove(kind = Varchar60)]
    span: Option<Duration>,
    #[grove(kind = Blob)]
    payload: Vec<u8>,
    #[grove(kind = Enum, not_null)]
    level: Level,
    #[grove(kind = Bool)]
    enabled: bool,
    scratch: u32,
}

pub async fn simple<D: Driver>(database: &Database<D>) {
    Simple::drop_table(database)
        .await
        .expect("Failed to drop grove_simple");

    // The first insert creates the table
    let span = Duration::hours(26) + Duration::minutes(3) + Duration::seconds(4);
    let mut entity = Simple {
        id: None,
        label: Some("first".into()),
        amount: 42,
        ratio: Some(0.25),
        span: Some(span),
        payload: vec![0, 1, 2, 255],
        level: Level::High,
        enabled: true,
        scratch: 7,
    };
    entity
        .sync(database)
        .await
        .expect("Failed to insert simple 1");
    let id = entity.id.expect("The generated id was not written back");
    assert!(id > 0);
    assert!(
        database
            .table_exists("grove_simple")
            .await
            .expect("Failed to probe grove_simple")
    );
    let found = Simple::require_by_primary(database, id)
        .await
        .expect("Failed to find simple 1");
    assert_eq!(found.id, Some(id));
    assert_eq!(found.label, Some("first".into()));
    assert_eq!(found.amount, 42);
    assert_eq!(found.ratio, Some(0.25));
    assert_eq!(found.span, Some(span));
    assert_eq!(found.payload, [0, 1, 2, 255]);
    assert_eq!(found.level, Level::High);
    assert!(found.enabled);
    assert_eq!(found.scratch, 0);

    // Update
    entity.amount = -7;
    entity.label = None;
    entity.enabled = false;
    entity
        .sync(database)
        .await
        .expect("Failed to update simple 1");
    let found = Simple::require_by_primary(database, id)
        .await
        .expect("Failed to find simple 1 after the update");
    assert_eq!(found.amount, -7);
    assert_eq!(found.label, None);
    assert!(!found.enabled);

    // Single field update
    entity.ratio = Some(1.5);
    entity.amount = 100;
    entity
        .update_field(database, "rat")
        .await
        .expect("Failed to update the ratio of simple 1");
    let found = Simple::require_by_primary(database, id)
        .await
        .expect("Failed to find simple 1 after the field update");
    assert_eq!(found.ratio, Some(1.5));
    assert_eq!(found.amount, -7);
    crate::silent_logs! {
        assert!(entity.update_field(database, "missing").await.is_err());
    }

    // Inserting the same primary again updates the row
    let mut duplicate = entity.clone();
    duplicate.label = Some("again".into());
    duplicate
        .insert(database)
        .await
        .expect("Failed to insert simple 1 twice");
    assert_eq!(duplicate.id, Some(id));
    assert_eq!(Simple::count_all(database).await.unwrap(), 1);
    let found = Simple::require_by_primary(database, id)
        .await
        .expect("Failed to find simple 1 after the upsert");
    assert_eq!(found.label, Some("again".into()));

    // Delete
    entity
        .delete(database)
        .await
        .expect("Failed to delete simple 1");
    assert!(
        Simple::select_by_primary(database, id)
            .await
            .expect("Failed to query simple 1 after the delete")
            .is_none()
    );
    crate::silent_logs! {
        assert!(Simple::require_by_primary(database, id).await.is_err());
    }

    // Reading from a missing table creates it and gives nothing
    Simple::drop_table(database)
        .await
        .expect("Failed to drop grove_simple");
    assert!(
        Simple::select_all(database, None)
            .await
            .expect("Failed to select from the missing grove_simple")
            .is_empty()
    );
    assert!(
        database
            .table_exists("grove_simple")
            .await
            .expect("Failed to probe grove_simple")
    );
}
