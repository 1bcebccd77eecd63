//! Integration tests for the structure reader

mod helpers;

use ctrack_board::reader::get_tree;
use ctrack_board::NodeKind;

#[tokio::test]
async fn test_empty_tree() {
    let db = helpers::setup().await;
    let tree = get_tree(&db.pool, db.user, true).await.unwrap();
    assert!(tree.phases.is_empty());
}

#[tokio::test]
async fn test_tree_is_nested_and_ordered() {
    let db = helpers::setup().await;
    let (p1, w1, d1) = db.chain("A").await;
    db.create(NodeKind::Phase, None, "Empty phase").await;
    db.create(NodeKind::Week, Some(p1), "Empty week").await;
    db.create(NodeKind::Day, Some(w1), "Second day").await;
    db.create(NodeKind::Resource, Some(d1), "R1").await;
    db.create(NodeKind::Resource, Some(d1), "R2").await;

    let tree = get_tree(&db.pool, db.user, true).await.unwrap();

    let phase_titles: Vec<&str> = tree.phases.iter().map(|p| p.phase.title.as_str()).collect();
    assert_eq!(phase_titles, vec!["A phase", "Empty phase"]);
    assert!(tree.phases[1].weeks.is_empty(), "empty phases still appear");

    let weeks = &tree.phases[0].weeks;
    assert_eq!(weeks.len(), 2);
    assert!(weeks[1].days.is_empty());

    let days = &weeks[0].days;
    assert_eq!(days.len(), 2);
    assert_eq!(days[0].day.title, "A day");
    let resource_titles: Vec<&str> = days[0].resources.iter().map(|r| r.title.as_str()).collect();
    assert_eq!(resource_titles, vec!["R1", "R2"]);
    assert!(days[1].resources.is_empty());
}

#[tokio::test]
async fn test_resources_omitted_on_request() {
    let db = helpers::setup().await;
    let (_, _, day) = db.chain("A").await;
    db.create(NodeKind::Resource, Some(day), "R1").await;

    let tree = get_tree(&db.pool, db.user, false).await.unwrap();
    let day = &tree.phases[0].weeks[0].days[0];
    assert!(day.resources.is_empty());

    let json = serde_json::to_value(&tree).unwrap();
    assert!(json["phases"][0]["weeks"][0]["days"][0]["resources"].is_array());
}

#[tokio::test]
async fn test_tree_reflects_reorder() {
    let db = helpers::setup().await;
    db.create(NodeKind::Phase, None, "A").await;
    let b = db.create(NodeKind::Phase, None, "B").await;

    let request = ctrack_board::reorder::ReorderRequest {
        kind: NodeKind::Phase,
        id: b.id,
        new_parent_id: None,
        new_index: 0,
    };
    ctrack_board::reorder::reorder(&db.pool, &db.policy, db.user, &request)
        .await
        .unwrap();

    let tree = get_tree(&db.pool, db.user, false).await.unwrap();
    assert_eq!(tree.phases[0].phase.title, "B");
    assert_eq!(tree.phases[0].phase.order_index, 0);
    assert_eq!(tree.phases[1].phase.order_index, 1);
}

#[tokio::test]
async fn test_inbox_flags_are_exposed() {
    let db = helpers::setup().await;
    db.create(NodeKind::Resource, None, "Loose").await;

    let tree = get_tree(&db.pool, db.user, true).await.unwrap();
    let phase = &tree.phases[0];
    assert!(phase.phase.is_inbox);
    assert_eq!(phase.phase.color, "#9ca3af");
    assert_eq!(phase.weeks[0].week.title, "Unsorted");
    assert_eq!(phase.weeks[0].days[0].day.title, "Inbox");
    assert_eq!(phase.weeks[0].days[0].resources[0].title, "Loose");
}

#[tokio::test]
async fn test_users_see_only_their_tree() {
    let db = helpers::setup().await;
    let alice = db.add_user("alice").await;
    db.create_as(alice, NodeKind::Phase, None, "Alice's").await;
    db.create(NodeKind::Phase, None, "Mine").await;

    let mine = get_tree(&db.pool, db.user, true).await.unwrap();
    assert_eq!(mine.phases.len(), 1);
    assert_eq!(mine.phases[0].phase.title, "Mine");

    let theirs = get_tree(&db.pool, alice, true).await.unwrap();
    assert_eq!(theirs.phases.len(), 1);
    assert_eq!(theirs.phases[0].phase.title, "Alice's");
}
