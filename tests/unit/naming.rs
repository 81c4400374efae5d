use componentry::component::naming::{component_name_from_type, reference_for_type, type_name_for_reference};

#[test]
fn test_reference_round_trip() {
    for reference in ["card", "user_card", "admin/user_card", "html_widget"] {
        let type_name = type_name_for_reference(reference);
        assert_eq!(reference_for_type(&type_name).as_deref(), Some(reference), "via {type_name}");
    }
}

#[test]
fn test_suffix_not_duplicated() {
    assert_eq!(type_name_for_reference("card_component"), "CardComponent");
    assert_eq!(type_name_for_reference("component_card"), "ComponentCard");
}

#[test]
fn test_component_name_drops_namespace_and_suffix() {
    assert_eq!(component_name_from_type("Admin::UserCardComponent"), "user_card");
}
