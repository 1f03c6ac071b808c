use grove::{Database, Driver, Entity};

#[derive(Entity, Default, Debug, Clone, PartialEq)]
#[table_name("grove_evolving")]
struct Before {
    #[grove(primary_key, not_null)]
    id: Option<i32>,
    #[grove(kind = Varchar60)]
    name: String,
}

#[derive(Entity, Default, Debug, Clone, PartialEq)]
#[table_name("grove_evolving")]
struct After {
    #[grove(primary_key, not_null)]
    id: Option<i32>,
    #[grove(kind = Varchar60)]
    name: String,
    #[grove(kind = Int12)]
    age: Option<i32>,
}

pub async fn migration<D: Driver>(database: &Database<D>) {
    Before::drop_table(database)
        .await
        .expect("Failed to drop grove_evolving");
    let mut before = Before {
        id: None,
        name: "Ada".into(),
    };
    before
        .sync(database)
        .await
        .expect("Failed to insert the old shape");
    let id = before.id.expect("The generated id was not written back");
    assert!(
        !database
            .column_exists("grove_evolving", "age")
            .await
            .expect("Failed to probe the column")
    );

    // The update adds the missing column and runs again
    let mut after = After {
        id: Some(id),
        name: "Ada".into(),
        age: Some(36),
    };
    after
        .sync(database)
        .await
        .expect("Failed to update with the new shape");
    assert!(
        database
            .column_exists("grove_evolving", "age")
            .await
            .expect("Failed to probe the column")
    );
    let found = After::require_by_primary(database, id)
        .await
        .expect("Failed to find the new shape");
    assert_eq!(found.age, Some(36));
    let found = Before::require_by_primary(database, id)
        .await
        .expect("Failed to find the old shape");
    assert_eq!(found.name, "Ada");
}
