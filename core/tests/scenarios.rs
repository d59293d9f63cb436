use std::collections::BTreeSet;

use slash_schema_core::{
    ChannelType, Locale, Localizations, OptionType, Parent, PermissionType, SchemaError, SchemaTree,
    validate_tree,
};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn assert_unchanged<F>(tree: &mut SchemaTree, mutation: F) -> SchemaError
where
    F: FnOnce(&mut SchemaTree) -> Result<(), SchemaError>,
{
    let before = tree.clone();
    let err = mutation(tree).expect_err("mutation should be rejected");
    assert_eq!(*tree, before, "rejected mutation changed the tree");
    err
}

// ---------------------------------------------------------------------------
// Bounds follow the type
// ---------------------------------------------------------------------------

#[test]
fn test_retype_with_bounds_set_is_rejected() {
    let mut tree = SchemaTree::new();
    let age = tree.create_option("age", "Your age", OptionType::Integer).unwrap();
    tree.option_mut(age)
        .unwrap()
        .set_integer_min(Some(0))
        .unwrap()
        .set_integer_max(Some(120))
        .unwrap();

    let err = assert_unchanged(&mut tree, |tree| {
        tree.option_mut(age)?.set_type(OptionType::String)?;
        Ok(())
    });
    assert!(matches!(err, SchemaError::BoundsViolation(_)));
    assert_eq!(tree.option(age).unwrap().integer_bounds().max, Some(120));

    tree.option_mut(age)
        .unwrap()
        .set_integer_bounds(None, None)
        .unwrap()
        .set_type(OptionType::String)
        .unwrap();
    assert_eq!(tree.option(age).unwrap().option_type(), OptionType::String);
}

// ---------------------------------------------------------------------------
// Required ordering
// ---------------------------------------------------------------------------

#[test]
fn test_required_ordering_on_wholesale_and_single_field() {
    let mut tree = SchemaTree::new();
    let cmd = tree.create_command("report", "Report a member").unwrap();
    let a = tree.create_option("a", "First", OptionType::String).unwrap();
    let b = tree.create_option("b", "Second", OptionType::String).unwrap();
    let c = tree.create_option("c", "Third", OptionType::String).unwrap();
    tree.option_mut(b).unwrap().set_required(false).unwrap();

    tree.command_mut(cmd).unwrap().set_options(vec![a, b]).unwrap();

    let err = assert_unchanged(&mut tree, |tree| {
        tree.command_mut(cmd)?.set_options(vec![a, b, c])?;
        Ok(())
    });
    assert!(matches!(err, SchemaError::OrderViolation(_)));
    assert_eq!(tree.option(c).unwrap().parent(), None);

    tree.command_mut(cmd).unwrap().set_options(vec![a, c, b]).unwrap();
    let err = assert_unchanged(&mut tree, |tree| {
        tree.option_mut(a)?.set_required(false)?;
        Ok(())
    });
    assert!(matches!(err, SchemaError::OrderViolation(_)));

    tree.option_mut(b).unwrap().set_required(true).unwrap();
    tree.option_mut(a).unwrap().set_name("first").unwrap();
    assert!(validate_tree(&tree).is_empty());
}

// ---------------------------------------------------------------------------
// Nesting
// ---------------------------------------------------------------------------

#[test]
fn test_group_with_non_subcommand_child_is_rejected() {
    let mut tree = SchemaTree::new();
    let group = tree.create_option("group", "A group", OptionType::SubcommandGroup).unwrap();
    let sub1 = tree.create_option("sub1", "A subcommand", OptionType::Subcommand).unwrap();
    let opt2 = tree.create_option("opt2", "A string", OptionType::String).unwrap();

    let err = assert_unchanged(&mut tree, |tree| {
        tree.option_mut(group)?.set_options(vec![sub1, opt2])?;
        Ok(())
    });
    assert_eq!(
        err,
        SchemaError::IncompatibleType("SUBCOMMAND_GROUP can only have SUBCOMMAND options".to_string())
    );
}

#[test]
fn test_group_under_group_is_rejected() {
    let mut tree = SchemaTree::new();
    let outer = tree.create_option("outer", "Outer", OptionType::SubcommandGroup).unwrap();
    let inner = tree.create_option("inner", "Inner", OptionType::SubcommandGroup).unwrap();

    let err = tree.option_mut(outer).unwrap().set_options(vec![inner]).unwrap_err();
    assert!(matches!(err, SchemaError::IncompatibleType(_)));
}

#[test]
fn test_subcommand_cannot_become_group_under_group() {
    let mut tree = SchemaTree::new();
    let group = tree.create_option("group", "A group", OptionType::SubcommandGroup).unwrap();
    let sub = tree.create_option("sub", "A subcommand", OptionType::Subcommand).unwrap();
    tree.option_mut(group).unwrap().set_options(vec![sub]).unwrap();

    let err = assert_unchanged(&mut tree, |tree| {
        tree.option_mut(sub)?.set_type(OptionType::SubcommandGroup)?;
        Ok(())
    });
    assert!(matches!(err, SchemaError::IncompatibleType(_)));
}

#[test]
fn test_three_level_tree_validates() {
    let mut tree = SchemaTree::new();
    let cmd = tree.create_command("config", "Server configuration").unwrap();
    let group = tree.create_option("logging", "Logging settings", OptionType::SubcommandGroup).unwrap();
    let set = tree.create_option("set", "Set the log channel", OptionType::Subcommand).unwrap();
    let channel = tree.create_option("channel", "Target channel", OptionType::Channel).unwrap();
    let verbose = tree.create_option("verbose", "Log everything", OptionType::Boolean).unwrap();

    tree.option_mut(channel)
        .unwrap()
        .set_channel_type_bounds([ChannelType::ServerText, ChannelType::ServerNews])
        .unwrap();
    tree.option_mut(verbose).unwrap().set_required(false).unwrap();
    tree.option_mut(set).unwrap().set_options(vec![channel, verbose]).unwrap();
    tree.option_mut(group).unwrap().set_options(vec![set]).unwrap();
    tree.command_mut(cmd)
        .unwrap()
        .set_options(vec![group])
        .unwrap()
        .set_required_permissions(Some(BTreeSet::from([PermissionType::ManageServer])))
        .unwrap();

    assert_eq!(tree.option(channel).unwrap().parent(), Some(Parent::Option(set)));
    assert_eq!(tree.option(group).unwrap().parent(), Some(Parent::Command(cmd)));
    assert!(validate_tree(&tree).is_empty());
}

// ---------------------------------------------------------------------------
// Choices
// ---------------------------------------------------------------------------

#[test]
fn test_inferred_integer_choice_fits_integer_option() {
    let mut tree = SchemaTree::new();
    let answer = tree.infer_choice("The answer", 42i64).unwrap();
    assert_eq!(tree.choice(answer).unwrap().choice_type(), OptionType::Integer);

    let option = tree.create_option("pick", "Pick one", OptionType::Integer).unwrap();
    tree.option_mut(option).unwrap().set_choices(vec![answer]).unwrap();

    let number = tree.create_option("ratio", "Pick a ratio", OptionType::Number).unwrap();
    let half = tree.infer_choice("Half", 0.5).unwrap();
    let err = tree.option_mut(number).unwrap().set_choices(vec![half, answer]).unwrap_err();
    assert!(matches!(err, SchemaError::AlreadyAttached(_)));
}

#[test]
fn test_choices_rejected_while_autocompletable() {
    let mut tree = SchemaTree::new();
    let cmd = tree.create_command("search", "Search the docs").unwrap();
    let query = tree.create_option("query", "What to look for", OptionType::String).unwrap();
    tree.command_mut(cmd).unwrap().set_options(vec![query]).unwrap();
    tree.option_mut(query).unwrap().set_autocompletable(true).unwrap();
    let one = tree.create_choice(OptionType::String, "One", "one").unwrap();

    let err = assert_unchanged(&mut tree, |tree| {
        tree.option_mut(query)?.set_choices(vec![one])?;
        Ok(())
    });
    assert!(matches!(err, SchemaError::MutualExclusionViolation(_)));
    assert_eq!(tree.choice(one).unwrap().parent(), None);
}

#[test]
fn test_choice_cap() {
    let mut tree = SchemaTree::new();
    let option = tree.create_option("level", "Pick a level", OptionType::Integer).unwrap();
    let choices: Vec<_> = (0..26i64)
        .map(|i| tree.create_choice(OptionType::Integer, format!("Level {i}"), i).unwrap())
        .collect();

    let err = tree.option_mut(option).unwrap().set_choices(choices.clone()).unwrap_err();
    assert!(matches!(err, SchemaError::LengthExceeded(_)));
    tree.option_mut(option).unwrap().set_choices(choices[..25].to_vec()).unwrap();
}

// ---------------------------------------------------------------------------
// Names
// ---------------------------------------------------------------------------

#[test]
fn test_option_name_case_rule() {
    let mut tree = SchemaTree::new();
    let err = tree.create_option("Hello", "Greeting", OptionType::String).unwrap_err();
    assert!(matches!(err, SchemaError::InvalidFormat(_)));

    let id = tree.create_option("hello", "Greeting", OptionType::String).unwrap();
    let err = assert_unchanged(&mut tree, |tree| {
        tree.option_mut(id)?.set_name("Hello")?;
        Ok(())
    });
    assert!(matches!(err, SchemaError::InvalidFormat(_)));
}

#[test]
fn test_rename_collides_with_sibling() {
    let mut tree = SchemaTree::new();
    let cmd = tree.create_command("move", "Move a member").unwrap();
    let from = tree.create_option("from", "Source", OptionType::Channel).unwrap();
    let to = tree.create_option("to", "Target", OptionType::Channel).unwrap();
    tree.command_mut(cmd).unwrap().set_options(vec![from, to]).unwrap();

    let err = assert_unchanged(&mut tree, |tree| {
        tree.option_mut(to)?.set_name("from")?;
        Ok(())
    });
    assert!(matches!(err, SchemaError::DuplicateName(_)));

    tree.option_mut(to).unwrap().set_name("destination").unwrap();
}

#[test]
fn test_localized_overlong_description_message() {
    let mut tree = SchemaTree::new();
    let cmd = tree.create_command("ping", "Replies with pong").unwrap();
    let mut descriptions = Localizations::new();
    descriptions.insert(Locale::French, "x".repeat(101));

    let err = tree
        .command_mut(cmd)
        .unwrap()
        .set_description_localizations(descriptions)
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "length exceeded: description for locale fr must not exceed 100 characters"
    );
}

// ---------------------------------------------------------------------------
// Lifecycle
// ---------------------------------------------------------------------------

#[test]
fn test_discarded_ids_stay_dead() {
    let mut tree = SchemaTree::new();
    let first = tree.create_option("first", "First", OptionType::String).unwrap();
    tree.discard_option(first).unwrap();
    let second = tree.create_option("second", "Second", OptionType::String).unwrap();

    assert_ne!(first, second);
    assert!(matches!(tree.option_mut(first), Err(SchemaError::UnknownNode(_))));
    let cmd = tree.create_command("cmd", "A command").unwrap();
    let err = tree.command_mut(cmd).unwrap().set_options(vec![first]).unwrap_err();
    assert!(matches!(err, SchemaError::UnknownNode(_)));
}
