//! Controlled-vocabulary attachment, ordering and recall.

use uuid::Uuid;
use vidcat_core::defaults::RANGE_DESCRIPTOR_VALUE;
use vidcat_core::{
    browse_descriptors_and_types, descriptor_types_for, descriptors_by_type,
    CreateDescriptorValueRequest, CreatePropertyClassRequest, CreatePropertyTypeRequest, Error,
    SchemaRepository, VideoRepository,
};
use vidcat_db::test_fixtures::TestDatabase;

/// Types a..d with priorities 2, 1, 3, 4 and five values spread over a, b, c.
async fn seed_sorting_fixture(test_db: &TestDatabase) -> (Vec<Uuid>, Vec<Uuid>) {
    let class = test_db
        .db
        .schema
        .create_class(CreatePropertyClassRequest {
            name: "Sorting Descriptor".to_string(),
            range: RANGE_DESCRIPTOR_VALUE.to_string(),
            multivalued: Some(true),
            optional: Some(true),
        })
        .await
        .unwrap();

    let mut types = Vec::new();
    for (name, priority) in [("a", 2), ("b", 1), ("c", 3), ("d", 4)] {
        let pt = test_db
            .db
            .schema
            .create_type(CreatePropertyTypeRequest {
                name: name.to_string(),
                property_class_id: class.id,
                priority,
                browsable: true,
            })
            .await
            .unwrap();
        types.push(pt.id);
    }

    let mut values = Vec::new();
    for (type_idx, text, priority) in [(0, "aa", 2), (0, "ab", 1), (0, "ac", 3), (1, "ba", 1), (2, "ba", 1)] {
        let dv = test_db
            .db
            .schema
            .create_descriptor_value(CreateDescriptorValueRequest {
                property_type_id: types[type_idx],
                value: text.to_string(),
                priority,
            })
            .await
            .unwrap();
        values.push(dv.id);
    }
    (types, values)
}

#[tokio::test]
async fn test_descriptors_start_empty_and_can_be_added() {
    let test_db = TestDatabase::new();
    let schema = test_db.schema().await;
    let genre = schema.type_by_name("Genre").unwrap();
    let documentary = schema.vocabulary().find_by_value(genre.id, "Documentary").unwrap();

    let mut video = test_db.video("Man with a Movie Camera");
    assert!(video.descriptor_value_ids.is_empty());
    video.add_descriptor(documentary.id).unwrap();
    assert!(video.validate(&schema));
    assert!(test_db.db.videos.insert(video).await.unwrap().is_saved());
}

#[tokio::test]
async fn test_descriptors_must_be_unique() {
    let test_db = TestDatabase::new();
    let schema = test_db.schema().await;
    let genre = schema.type_by_name("Genre").unwrap();
    let drama = schema.vocabulary().find_by_value(genre.id, "Drama").unwrap();

    let mut video = test_db.video("Greed");
    video.add_descriptor(drama.id).unwrap();
    let err = video.add_descriptor(drama.id).unwrap_err();
    assert!(matches!(
        err,
        Error::DuplicateDescriptor { descriptor_value_id, .. } if descriptor_value_id == drama.id
    ));
}

#[tokio::test]
async fn test_unknown_descriptor_id_is_rejected_on_save() {
    let test_db = TestDatabase::new();
    let mut video = test_db.video("Greed");
    video.add_descriptor(Uuid::nil()).unwrap();
    let err = test_db.db.videos.insert(video).await.unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));
}

#[tokio::test]
async fn test_types_for_video_in_priority_order() {
    let test_db = TestDatabase::new();
    let (types, values) = seed_sorting_fixture(&test_db).await;

    let mut video = test_db.video("Sorting");
    video.set_descriptors(&values).unwrap();
    let id = video.id;
    assert!(test_db.db.videos.insert(video).await.unwrap().is_saved());

    let video = test_db.db.videos.fetch(id).await.unwrap();
    let schema = test_db.schema().await;
    let found: Vec<Uuid> = descriptor_types_for(&schema, &video).iter().map(|t| t.id).collect();
    assert_eq!(found, vec![types[1], types[0], types[2]]);
}

#[tokio::test]
async fn test_descriptors_for_video_in_priority_order() {
    let test_db = TestDatabase::new();
    let (types, values) = seed_sorting_fixture(&test_db).await;

    let mut video = test_db.video("Sorting");
    video.set_descriptors(&values).unwrap();
    let schema = test_db.schema().await;

    let ids = |type_id: Uuid| -> Vec<Uuid> {
        descriptors_by_type(&schema, &video, type_id)
            .iter()
            .map(|d| d.id)
            .collect()
    };
    assert_eq!(ids(types[0]), vec![values[1], values[0], values[2]]);
    assert_eq!(ids(types[1]), vec![values[3]]);
    assert_eq!(ids(types[2]), vec![values[4]]);
    assert!(ids(types[3]).is_empty());
}

#[tokio::test]
async fn test_browse_descriptors_and_types() {
    let test_db = TestDatabase::new();
    let (types, values) = seed_sorting_fixture(&test_db).await;
    let schema = test_db.schema().await;
    let genre = schema.type_by_name("Genre").unwrap();
    let comedy = schema.vocabulary().find_by_value(genre.id, "Comedy").unwrap();

    let mut video = test_db.video("Sorting");
    video.set_descriptors(&[values[3], values[0], comedy.id]).unwrap();

    let pairs = browse_descriptors_and_types(&schema, &video);
    let shape: Vec<(Uuid, usize)> = pairs.iter().map(|(t, vs)| (t.id, vs.len())).collect();
    // Genre has priority 1 and sorts before "b" by name
    assert_eq!(shape, vec![(genre.id, 1), (types[1], 1), (types[0], 1)]);
}

#[tokio::test]
async fn test_most_recent_video_using() {
    let test_db = TestDatabase::new();
    let schema = test_db.schema().await;
    let genre = schema.type_by_name("Genre").unwrap();
    let drama = schema.vocabulary().find_by_value(genre.id, "Drama").unwrap().id;
    let comedy = schema.vocabulary().find_by_value(genre.id, "Comedy").unwrap().id;

    assert!(test_db.db.videos.most_recent_using(drama).await.unwrap().is_none());

    let mut first = test_db.video("First");
    first.add_descriptor(drama).unwrap();
    let mut second = test_db.video("Second");
    second.add_descriptor(drama).unwrap();
    // Same instant: the later-minted id wins
    second.created_at = first.created_at;
    let mut third = test_db.video("Third");
    third.add_descriptor(comedy).unwrap();

    let second_id = second.id;
    for v in [first, second, third] {
        assert!(test_db.db.videos.insert(v).await.unwrap().is_saved());
    }

    let found = test_db.db.videos.most_recent_using(drama).await.unwrap().unwrap();
    assert_eq!(found.id, second_id);
}
