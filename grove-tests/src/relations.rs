use grove::{Comparator, Database, Driver, Entity};

#[derive(Entity, Default, Debug, Clone, PartialEq)]
#[table_name("grove_owners")]
struct Owner {
    #[grove(primary_key, not_null)]
    id: Option<i32>,
    #[grove(kind = Varchar120, not_null)]
    name: String,
    #[grove(embedded_list = "owner_id")]
    pets: Vec<Pet>,
    #[grove(embedded_table = "owner_id")]
    address: Option<Address>,
}

#[derive(Entity, Default, Debug, Clone, PartialEq)]
#[table_name("grove_pets")]
struct Pet {
    #[grove(primary_key, not_null)]
    id: Option<i32>,
    #[grove(kind = Int12)]
    owner_id: Option<i32>,
    #[grove(kind = Varchar60, not_null)]
    name: String,
}

#[derive(Entity, Default, Debug, Clone, PartialEq)]
#[table_name("grove_addresses")]
struct Address {
    #[grove(primary_key, not_null)]
    id: Option<i32>,
    #[grove(kind = Int12)]
    owner_id: Option<i32>,
    #[grove(kind = Varchar120)]
    street: String,
}

fn pet(name: &str) -> Pet {
    Pet {
        id: None,
        owner_id: None,
        name: name.into(),
    }
}

pub async fn relations<D: Driver>(database: &Database<D>) {
    Owner::drop_table(database)
        .await
        .expect("Failed to drop grove_owners");
    Pet::drop_table(database)
        .await
        .expect("Failed to drop grove_pets");
    Address::drop_table(database)
        .await
        .expect("Failed to drop grove_addresses");

    let mut owner = Owner {
        id: None,
        name: "Ada".into(),
        pets: vec![pet("Rex"), pet("Tom")],
        address: Some(Address {
            id: None,
            owner_id: None,
            street: "Main street 1".into(),
        }),
    };
    owner
        .sync(database)
        .await
        .expect("Failed to insert the owner");
    let id = owner.id.expect("The owner id was not written back");
    for pet in &owner.pets {
        assert!(pet.id.is_some());
        assert_eq!(pet.owner_id, Some(id));
    }
    let address = owner.address.as_ref().expect("The address disappeared");
    assert!(address.id.is_some());
    assert_eq!(address.owner_id, Some(id));

    let mut solo = Owner {
        id: None,
        name: "Solo".into(),
        pets: Vec::new(),
        address: None,
    };
    solo.sync(database)
        .await
        .expect("Failed to insert the owner without pets");

    let found = Owner::require_by_primary(database, id)
        .await
        .expect("Failed to find the owner");
    let mut names = found.pets.iter().map(|v| v.name.as_str()).collect::<Vec<_>>();
    names.sort();
    assert_eq!(names, ["Rex", "Tom"]);
    assert_eq!(
        found.address.as_ref().map(|v| v.street.as_str()),
        Some("Main street 1")
    );

    let found = Owner::select_where(
        database,
        &["name"],
        vec!["Solo".into()],
        Comparator::Equal,
        None,
    )
    .await
    .expect("Failed to find the owner without pets");
    assert_eq!(found.len(), 1);
    assert!(found[0].pets.is_empty());
    assert!(found[0].address.is_none());

    let projected = Owner::select_fields(database, &["id", "name"], None)
        .await
        .expect("Failed to select the owners without relations");
    assert_eq!(projected.len(), 2);
    assert!(projected.iter().all(|v| v.pets.is_empty() && v.address.is_none()));

    // Children added later are inserted by the update
    owner.pets.push(pet("Kit"));
    owner
        .sync(database)
        .await
        .expect("Failed to update the owner");
    assert!(owner.pets[2].id.is_some());
    assert_eq!(owner.pets[2].owner_id, Some(id));
    assert_eq!(Pet::count_all(database).await.unwrap(), 3);

    owner
        .delete(database)
        .await
        .expect("Failed to delete the owner");
    assert_eq!(Owner::count_all(database).await.unwrap(), 1);
    assert_eq!(Pet::count_all(database).await.unwrap(), 0);
    assert_eq!(Address::count_all(database).await.unwrap(), 0);
}
