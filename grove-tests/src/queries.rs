use grove::{Comparator, Database, Driver, Entity, Limiter, Order};

#[derive(Entity, Default, Debug, Clone, PartialEq)]
#[table_name("grove_cities")]
struct City {
    #[grove(primary_key, not_null)]
    id: Option<i32>,
    #[grove(kind = Varchar60, not_null)]
    name: String,
    #[grove(kind = Varchar60)]
    country: Option<String>,
    #[grove(kind = Int12, not_null)]
    population: i32,
}

pub async fn queries<D: Driver>(database: &Database<D>) {
    City::drop_table(database)
        .await
        .expect("Failed to drop grove_cities");
    let cities = [
        ("Rome", Some("Italy"), 2_750_000),
        ("Milan", Some("Italy"), 1_350_000),
        ("Lyon", Some("France"), 520_000),
        ("Atlantis", None, 0),
    ];
    for (name, country, population) in cities {
        let mut city = City {
            id: None,
            name: name.into(),
            country: country.map(Into::into),
            population,
        };
        city.sync(database)
            .await
            .expect("Failed to insert a city");
    }

    let all = City::select_all(database, None)
        .await
        .expect("Failed to select the cities");
    assert_eq!(all.len(), 4);

    let largest = City::select_all(
        database,
        Some(Limiter::new(2).order_by("population", Order::Descending)),
    )
    .await
    .expect("Failed to select the largest cities");
    assert_eq!(
        largest.iter().map(|v| v.name.as_str()).collect::<Vec<_>>(),
        ["Rome", "Milan"]
    );

    let italian = City::select_where(
        database,
        &["country"],
        vec!["Italy".into()],
        Comparator::Equal,
        Some(Limiter::new(0).order_by("name", Order::Ascending)),
    )
    .await
    .expect("Failed to select the italian cities");
    assert_eq!(
        italian.iter().map(|v| v.name.as_str()).collect::<Vec<_>>(),
        ["Milan", "Rome"]
    );

    let small = City::select_fields_where(
        database,
        &["name"],
        &["population"],
        vec![1_000_000.into()],
        Comparator::LessThan,
        None,
    )
    .await
    .expect("Failed to select the small cities");
    assert_eq!(small.len(), 2);
    assert!(small.iter().all(|v| v.id.is_none() && v.population == 0));

    let unknown = City::select_where_null(database, &["country"], None)
        .await
        .expect("Failed to select the cities without country");
    assert_eq!(unknown.len(), 1);
    assert_eq!(unknown[0].name, "Atlantis");

    let names = City::select_fields_where_null(database, &["id", "name"], &["country"], None)
        .await
        .expect("Failed to select the names of the cities without country");
    assert_eq!(names[0].name, "Atlantis");
    let id = names[0].id.expect("The id was not selected");

    let only_name = City::select_fields_by_primary(database, &["name"], id)
        .await
        .expect("Failed to select a city by primary")
        .expect("The city was not found");
    assert_eq!(only_name.name, "Atlantis");
    assert_eq!(only_name.id, None);

    let projected = City::select_fields(database, &["population"], Some(Limiter::new(1)))
        .await
        .expect("Failed to select the populations");
    assert_eq!(projected.len(), 1);
    assert!(projected[0].name.is_empty());

    assert!(
        City::select_where(
            database,
            &["password"],
            vec!["x".into()],
            Comparator::Equal,
            None
        )
        .await
        .is_err()
    );
    assert!("like".parse::<Comparator>().is_err());
}
