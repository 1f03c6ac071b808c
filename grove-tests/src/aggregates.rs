use grove::{Comparator, Database, Driver, Entity};

#[derive(Entity, Default, Debug, Clone, PartialEq)]
#[table_name("grove_scores")]
struct Score {
    #[grove(primary_key, not_null)]
    id: Option<i32>,
    #[grove(kind = Varchar60, not_null)]
    player: String,
    #[grove(kind = Int12)]
    points: Option<i32>,
    #[grove(kind = Double, not_null)]
    weight: f64,
}

pub async fn aggregates<D: Driver>(database: &Database<D>) {
    Score::drop_table(database)
        .await
        .expect("Failed to drop grove_scores");

    // Aggregating a missing table creates it
    assert_eq!(Score::count_all(database).await.unwrap(), 0);
    assert_eq!(Score::sum_field(database, "points").await.unwrap(), 0.0);

    for (player, points, weight) in [
        ("a", Some(10), 1.0),
        ("b", Some(20), 0.5),
        ("c", None, 2.0),
        ("a", Some(5), 1.5),
    ] {
        let mut score = Score {
            id: None,
            player: player.into(),
            points,
            weight,
        };
        score
            .insert(database)
            .await
            .expect("Failed to insert a score");
    }

    assert_eq!(Score::count_all(database).await.unwrap(), 4);
    assert_eq!(Score::count_field(database, "points").await.unwrap(), 3);
    assert_eq!(
        Score::count_where(database, &["player"], vec!["a".into()], Comparator::Equal)
            .await
            .unwrap(),
        2
    );
    assert_eq!(
        Score::count_field_where(
            database,
            "points",
            &["weight"],
            vec![0.75.into()],
            Comparator::GreaterThan
        )
        .await
        .unwrap(),
        2
    );
    assert_eq!(
        Score::count_field_where_null(database, "id", &["points"])
            .await
            .unwrap(),
        1
    );
    assert_eq!(Score::sum_field(database, "points").await.unwrap(), 35.0);
    assert_eq!(
        Score::sum_field_where(database, "points", &["points"], vec![8.into()], Comparator::GreaterThan)
            .await
            .unwrap(),
        30.0
    );
    assert_eq!(
        Score::sum_field_where(database, "weight", &["player"], vec!["z".into()], Comparator::Equal)
            .await
            .unwrap(),
        0.0
    );
    assert_eq!(
        Score::sum_field_where_null(database, "weight", &["points"])
            .await
            .unwrap(),
        2.0
    );
    assert!(Score::sum_field(database, "nothing").await.is_err());
}
