mod resource {
    pub mod people;
}

#[cfg(test)]
mod tests {
    use crate::resource::people::{Mood, NoPrimary, Passport, Person, Pet, Unmapped, ada, pet};
    use grove::{
        AsValue, ConversionError, Entity, NotFoundError, RelationKind, RowLabeled, SchemaError,
        SqlKind, Value, decode, encode, find_primary_column,
    };
    use std::sync::Arc;
    use time::Duration;

    #[test]
    fn descriptor() {
        let descriptor = Person::descriptor().unwrap();
        assert_eq!(descriptor.entity, "Person");
        assert_eq!(descriptor.table_name(), "people");
        assert_eq!(
            descriptor
                .scalar_columns()
                .map(|v| v.name)
                .collect::<Vec<_>>(),
            ["id", "name", "age", "active", "mood", "rest"]
        );
        let id = descriptor.primary().unwrap();
        assert_eq!(id.name, "id");
        assert_eq!(id.kind, Some(SqlKind::Int12));
        assert!(!id.nullable);
        let mood = descriptor.column("mood").unwrap();
        assert_eq!(mood.field, "humor");
        assert_eq!(mood.sql_type(), "TINYINT(4)");
        assert!(mood.nullable);

        let relations = descriptor.relations().collect::<Vec<_>>();
        assert_eq!(relations.len(), 2);
        assert_eq!(relations[0].name, "pets");
        assert_eq!(relations[0].relation, RelationKind::EmbeddedList);
        assert_eq!(relations[0].foreign_key, "person_id");
        assert_eq!(relations[0].related_table(), Some("pets"));
        assert_eq!(relations[1].name, "passport");
        assert_eq!(relations[1].relation, RelationKind::EmbeddedTable);
        assert_eq!(relations[1].related_table(), Some("passports"));
        assert_eq!(relations[1].sql_type(), "");

        assert_eq!(
            Pet::descriptor().unwrap().primary().unwrap().kind,
            Some(SqlKind::Int12)
        );
        assert_eq!(
            Passport::descriptor().unwrap().column("number").unwrap().kind,
            Some(SqlKind::Varchar60)
        );
    }

    #[test]
    fn missing_declarations() {
        let error = Unmapped::descriptor().unwrap_err();
        assert!(matches!(
            error.downcast_ref::<SchemaError>(),
            Some(SchemaError::MissingTableDeclaration { entity: "Unmapped" })
        ));
        let descriptor = NoPrimary::descriptor().unwrap();
        assert_eq!(descriptor.table_name(), "no_primary");
        let error = find_primary_column(descriptor).unwrap_err();
        assert!(error.downcast_ref::<NotFoundError>().is_some());
        assert_eq!(NoPrimary::default().primary_value(), Value::Null);
    }

    #[test]
    fn field_lookup() {
        let descriptor = Person::descriptor().unwrap();
        assert_eq!(descriptor.find_field("ag").unwrap().name, "age");
        assert_eq!(descriptor.find_field("hum").unwrap().name, "mood");
        assert!(descriptor.find_field("pets").is_none());
        assert!(descriptor.require_column("name").is_ok());
        assert!(descriptor.require_column("pets").is_err());
        assert!(descriptor.require_column("humor").is_err());
    }

    #[test]
    fn encode_flattens_depth_first() {
        let mut person = ada();
        person.pets = vec![pet("Rex"), pet("Tom")];
        person.passport = Some(Passport {
            id: None,
            person_id: None,
            number: "X1".into(),
        });
        let records = encode(&person).unwrap();
        assert_eq!(
            records.iter().map(|v| v.table()).collect::<Vec<_>>(),
            ["people", "pets", "pets", "passports"]
        );
        assert!(records[0].link.is_none());
        for record in &records[1..] {
            let link = record.link.unwrap();
            assert_eq!(link.parent, 0);
            assert_eq!(link.foreign_key, "person_id");
        }
        let root = &records[0];
        assert_eq!(root.items.len(), 6);
        assert!(root.primary().unwrap().value.is_null());
        assert_eq!(root.item("active").unwrap().value, Value::Int16(Some(1)));
        assert_eq!(root.item("mood").unwrap().value, Value::Int16(Some(1)));
        assert_eq!(
            root.item("rest").unwrap().value,
            Value::Varchar(Some("01:30:00".into()))
        );
        assert_eq!(
            root.insert_items().map(|v| v.column).collect::<Vec<_>>(),
            ["name", "age", "active", "mood", "rest"]
        );
        assert_eq!(
            records[2].item("name").unwrap().value,
            Value::Varchar(Some("Tom".into()))
        );
    }

    #[test]
    fn decode_row() {
        let labels: Arc<[String]> = ["id", "name", "age", "active", "mood", "rest", "extra"]
            .map(String::from)
            .into();
        let row = RowLabeled::new(
            labels.clone(),
            [
                Value::Int64(Some(3)),
                Value::Varchar(Some("Ada".into())),
                Value::Null,
                Value::Int64(Some(1)),
                Value::Int64(Some(2)),
                Value::Varchar(Some("2.01:00:00".into())),
                Value::Varchar(Some("ignored".into())),
            ]
            .into(),
        );
        let person: Person = decode(None, &row).unwrap();
        assert_eq!(person.id, Some(3));
        assert_eq!(person.name, "Ada");
        assert_eq!(person.age, None);
        assert!(person.active);
        assert_eq!(person.humor, Mood::Grumpy);
        assert_eq!(person.rest, Some(Duration::days(2) + Duration::hours(1)));
        assert!(person.pets.is_empty());
        assert_eq!(person.visits, 0);

        let person: Person = decode(Some(&["name"][..]), &row).unwrap();
        assert_eq!(person.id, None);
        assert_eq!(person.name, "Ada");
        assert!(!person.active);

        let row = RowLabeled::new(
            labels.clone(),
            [
                Value::Int64(Some(3)),
                Value::Varchar(Some("Ada".into())),
                Value::Int64(Some(40)),
                Value::Null,
                Value::Null,
                Value::Varchar(Some("soon".into())),
                Value::Null,
            ]
            .into(),
        );
        let person: Person = decode(None, &row).unwrap();
        assert_eq!(person.rest, None);
        assert_eq!(person.humor, Mood::Calm);
        assert!(!person.active);
    }

    #[test]
    fn decode_conversion_error() {
        let row = RowLabeled::new(
            ["id", "age"].map(String::from).into(),
            [Value::Int64(Some(1)), Value::Varchar(Some("old".into()))].into(),
        );
        let error = decode::<Person>(None, &row).unwrap_err();
        assert!(error.downcast_ref::<ConversionError>().is_some());
        assert!(format!("{:#}", error).contains("age"));
    }

    #[test]
    fn scalar_round_trip() {
        let mut person = ada();
        person.id = Some(12);
        let records = encode(&person).unwrap();
        let record = &records[0];
        let row = RowLabeled::new(
            record
                .items
                .iter()
                .map(|v| v.column.to_string())
                .collect::<Vec<_>>()
                .into(),
            record
                .items
                .iter()
                .map(|v| v.value.clone())
                .collect::<Vec<_>>()
                .into(),
        );
        let decoded: Person = decode(None, &row).unwrap();
        assert_eq!(decoded, person);
    }

    #[test]
    fn absorb_generated_keys() {
        let mut person = ada();
        person.pets = vec![pet("Rex")];
        let mut records = encode(&person).unwrap();
        records[0].set_primary(Value::Int64(Some(9)));
        records[1].set_primary(Value::Int64(Some(4)));
        records[1].set_value("person_id", Value::Int32(Some(9)));
        records[1].set_value("name", Value::Varchar(Some("Changed".into())));
        person.absorb(&mut records.iter()).unwrap();
        assert_eq!(person.id, Some(9));
        assert_eq!(person.pets[0].id, Some(4));
        assert_eq!(person.pets[0].person_id, Some(9));
        assert_eq!(person.pets[0].name, "Rex");
    }

    #[test]
    fn set_column() {
        let mut person = ada();
        person.set_column("age", Value::Int64(Some(5))).unwrap();
        assert_eq!(person.age, Some(5));
        person.set_column("mood", Value::UInt8(Some(0))).unwrap();
        assert_eq!(person.humor, Mood::Calm);
        person.set_column("unknown", Value::Null).unwrap();
        assert!(person.set_column("age", Value::Varchar(Some("x".into()))).is_err());
    }

    #[test]
    fn value_enum() {
        assert_eq!(Mood::Grumpy.as_value(), Value::Int16(Some(2)));
        assert_eq!(Mood::try_from_value(Value::Int64(Some(1))).unwrap(), Mood::Happy);
        let error = Mood::try_from_value(Value::Int64(Some(7))).unwrap_err();
        assert!(error.downcast_ref::<ConversionError>().is_some());
        assert_eq!(Option::<Mood>::try_from_value(Value::Null).unwrap(), None);
    }
}
