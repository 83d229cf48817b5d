use furbish_storefront::{dto::wishlist::ToggleWishlistRequest, wishlist::Wishlist};
use uuid::Uuid;

#[test]
fn toggle_adds_then_removes() {
    let id = Uuid::new_v4();
    let mut wishlist = Wishlist::default();

    assert!(wishlist.toggle(id));
    assert!(wishlist.contains(id));
    assert_eq!(wishlist.ids(), &[id]);

    assert!(!wishlist.toggle(id));
    assert!(!wishlist.contains(id));
    assert!(wishlist.ids().is_empty());
}

#[test]
fn removing_drops_every_copy() {
    let id = Uuid::new_v4();
    let other = Uuid::new_v4();
    let mut wishlist = Wishlist::new(vec![id, other, id]);

    assert!(!wishlist.toggle(id));
    assert_eq!(wishlist.into_ids(), vec![other]);
}

#[test]
fn unreadable_storage_is_an_empty_list() {
    assert_eq!(Wishlist::from_storage(None), Wishlist::default());
    assert_eq!(Wishlist::from_storage(Some("not json")), Wishlist::default());
    assert_eq!(Wishlist::from_storage(Some("{\"a\":1}")), Wishlist::default());
}

#[test]
fn storage_value_is_a_json_array_of_ids() {
    let id = Uuid::new_v4();
    let wishlist = Wishlist::new(vec![id]);

    let stored = wishlist.to_storage();
    assert_eq!(stored, format!("[\"{id}\"]"));
    assert_eq!(Wishlist::from_storage(Some(&stored)), wishlist);
}

#[test]
fn toggling_twice_restores_a_stored_list() {
    let kept = [Uuid::new_v4(), Uuid::new_v4()];
    let stored = Wishlist::new(kept.to_vec()).to_storage();
    let id = Uuid::new_v4();

    let mut wishlist = Wishlist::from_storage(Some(&stored));
    assert!(wishlist.toggle(id));
    assert_eq!(wishlist.ids(), &[kept[0], kept[1], id]);
    assert!(!wishlist.toggle(id));

    assert_eq!(wishlist.to_storage(), stored);
}

#[test]
fn stale_entries_do_not_wipe_the_list() {
    let id = Uuid::new_v4();
    let raw = format!("[\"{id}\", \"1\", 7, null, \" {id} \"]");

    let wishlist = Wishlist::from_storage(Some(&raw));
    assert_eq!(wishlist.ids(), &[id, id]);
    assert_eq!(
        Wishlist::from_storage(Some("[\"1\", \"2\"]")),
        Wishlist::default()
    );
}

#[test]
fn request_bodies_keep_valid_ids() {
    let id = Uuid::new_v4();
    let product_id = Uuid::new_v4();
    let body = serde_json::json!({
        "wishlist": [id.to_string(), "1"],
        "product_id": product_id,
    });

    let request: ToggleWishlistRequest = serde_json::from_value(body).unwrap();
    assert_eq!(request.wishlist.ids(), &[id]);
    assert_eq!(request.product_id, product_id);
}
