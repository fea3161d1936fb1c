// ═══════════════════════════════════════════════════════════════════════
// Helpers
// ═══════════════════════════════════════════════════════════════════════
mod message_tests {
    use crate::accessor::FieldReader;
    use crate::config::AccessMode;
    use crate::error::FieldError;
    use crate::message::{Builder, Message, MessageType};
    use crate::value::{ProtoEnum, Value};
    use rustc_hash::FxHasher;
    use std::hash::{Hash, Hasher};

    static PERSON: MessageType = MessageType::new("test.Person", 6);
    static PLACE: MessageType = MessageType::new("test.Place", 6);
    static PERSON_WIDE: MessageType = MessageType::new("test.Person", 64);

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Level {
        Low,
        High,
        Unrecognized,
    }

    impl ProtoEnum for Level {
        const DEFAULT: Self = Level::Low;

        fn number(self) -> i32 {
            match self {
                Level::Low => 0,
                Level::High => 1,
                Level::Unrecognized => -1,
            }
        }

        fn from_number(number: i32) -> Option<Self> {
            match number {
                0 => Some(Level::Low),
                1 => Some(Level::High),
                _ => None,
            }
        }

        fn unrecognized() -> Option<Self> {
            Some(Level::Unrecognized)
        }
    }

    fn hash_of(message: &Message) -> u64 {
        let mut h = FxHasher::default();
        message.hash(&mut h);
        h.finish()
    }

    fn person(ty: &'static MessageType) -> Builder {
        let mut b = Builder::with_mode(ty, AccessMode::Checked);
        b.set_field(1, "ada").unwrap()
            .set_field(2, 36i32).unwrap()
            .set_field(40, true).unwrap();
        b.add_all_repeated_field(3, [1i64, 2, 3]).unwrap();
        b.put_map_field(4, "home", 1u32).unwrap();
        b
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Copy-on-write
    // ═══════════════════════════════════════════════════════════════════════

    #[test]
    fn test_to_builder_copies() {
        let message = person(&PERSON).build();
        let mut b = message.to_builder();
        b.add_repeated_field(3, 4i64).unwrap();
        b.put_map_field(4, "work", 2u32).unwrap();
        b.set_field(1, "grace").unwrap();

        assert_eq!(message.get_repeated_field_count(3), 3);
        assert_eq!(message.get_field_map::<u32>(4).len(), 1);
        assert_eq!(message.get_field(1, String::new()), Ok("ada".to_string()));
        assert_eq!(b.get_repeated_field_count(3), 4);
    }

    #[test]
    fn test_builder_clone_is_independent() {
        let mut a = person(&PERSON);
        let mut b = a.clone();
        a.add_repeated_field(3, 10i64).unwrap();
        b.put_map_field(4, "away", 9u32).unwrap();

        assert_eq!(a.get_repeated_field_count(3), 4);
        assert_eq!(b.get_repeated_field_count(3), 3);
        assert_eq!(a.get_field_map::<u32>(4).len(), 1);
        assert_eq!(b.get_field_map::<u32>(4).len(), 2);
    }

    #[test]
    fn test_views_from_builder_do_not_see_later_copies() {
        let a = person(&PERSON);
        let view = a.get_field_list::<i64>(3);
        let mut b = a.clone();
        b.add_repeated_field(3, 99i64).unwrap();
        assert_eq!(view.len(), 3);
    }

    #[test]
    fn test_message_clones_share_storage() {
        let message = person(&PERSON).build();
        let other = message.clone();
        assert_eq!(message, other);
        assert_eq!(hash_of(&message), hash_of(&other));
    }

    #[test]
    fn test_build_keeps_mode_and_type() {
        let message = Builder::with_mode(&PLACE, AccessMode::Unchecked).build();
        assert_eq!(message.access_mode(), AccessMode::Unchecked);
        assert_eq!(message.message_type().name, "test.Place");
        assert_eq!(message.to_builder().access_mode(), AccessMode::Unchecked);
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Equality & hashing
    // ═══════════════════════════════════════════════════════════════════════

    #[test]
    fn test_equal_content_equal_messages() {
        let a = person(&PERSON).build();
        let b = person(&PERSON).build();
        assert_eq!(a, b);
        assert_eq!(hash_of(&a), hash_of(&b));
    }

    #[test]
    fn test_pivot_does_not_change_identity() {
        let narrow = person(&PERSON).build();
        let wide = person(&PERSON_WIDE).build();
        assert_eq!(narrow, wide);
        assert_eq!(hash_of(&narrow), hash_of(&wide));
    }

    #[test]
    fn test_different_types_are_not_equal() {
        let person = Message::default_instance(&PERSON);
        let place = Message::default_instance(&PLACE);
        assert_ne!(person, place);
    }

    #[test]
    fn test_set_then_clear_equals_default() {
        let mut b = Builder::new(&PERSON);
        b.set_field(5, 1i64).unwrap().set_field(50, 1i64).unwrap();
        b.remove_field(5).unwrap().remove_field(50).unwrap();
        let message = b.build();
        assert_eq!(message, Message::default_instance(&PERSON));
        assert_eq!(hash_of(&message), hash_of(&Message::default_instance(&PERSON)));
    }

    #[test]
    fn test_nested_messages_compare_by_content() {
        let mut a = Builder::new(&PLACE);
        a.set_field(1, person(&PERSON).build()).unwrap();
        let mut b = Builder::new(&PLACE);
        b.set_field(1, person(&PERSON).build()).unwrap();
        assert_eq!(a.build(), b.build());
    }

    #[test]
    fn test_map_order_does_not_matter() {
        let mut a = Builder::new(&PERSON);
        a.put_map_field(4, "x", 1u32).unwrap();
        a.put_map_field(4, "y", 2u32).unwrap();
        let mut b = Builder::new(&PERSON);
        b.put_all_map_field(4, [("y", 2u32), ("x", 1u32)]).unwrap();

        let (a, b) = (a.build(), b.build());
        assert_eq!(a, b);
        assert_eq!(hash_of(&a), hash_of(&b));
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Writes
    // ═══════════════════════════════════════════════════════════════════════

    #[test]
    fn test_enum_placeholder_is_rejected() {
        let mut b = Builder::new(&PERSON);
        assert!(matches!(
            b.set_field_for_enum(2, Level::Unrecognized),
            Err(FieldError::InvalidArgument { field: 2, .. })
        ));
        assert!(matches!(
            b.add_repeated_field_for_enum(3, Level::Unrecognized),
            Err(FieldError::InvalidArgument { field: 3, .. })
        ));
        assert!(!b.has_field(2));
        assert!(!b.has_field(3));

        b.set_field_for_enum(2, Level::High).unwrap();
        assert_eq!(b.get_field_value(2), Some(Value::Enum(1)));
    }

    #[test]
    fn test_set_repeated_out_of_range_fails_in_both_modes() {
        for mode in [AccessMode::Checked, AccessMode::Unchecked] {
            let mut b = Builder::with_mode(&PERSON, mode);
            b.add_repeated_field(3, 1i64).unwrap();

            assert_eq!(
                b.set_repeated_field(3, 1, 5i64).err(),
                Some(FieldError::IndexOutOfRange {
                    field: 3,
                    index: 1,
                    len: 1
                })
            );
            assert_eq!(
                b.set_repeated_field(8, 0, 5i64).err(),
                Some(FieldError::IndexOutOfRange {
                    field: 8,
                    index: 0,
                    len: 0
                })
            );
            assert!(!b.has_field(8));

            b.set_repeated_field(3, 0, 7i64).unwrap();
            assert_eq!(b.get_repeated_field::<i64>(3, 0), Ok(7));
        }
    }

    #[test]
    fn test_container_writes_on_scalar_fail() {
        let mut b = Builder::new(&PERSON);
        b.set_field(1, 1i64).unwrap();
        assert!(matches!(
            b.add_repeated_field(1, 2i64),
            Err(FieldError::InvalidArgument { field: 1, .. })
        ));
        assert!(matches!(
            b.put_map_field(1, "k", 2i64),
            Err(FieldError::InvalidArgument { field: 1, .. })
        ));
        assert!(matches!(
            b.remove_map_field(1, "k"),
            Err(FieldError::InvalidArgument { field: 1, .. })
        ));
        assert_eq!(b.get_field(1, 0i64), Ok(1));
    }

    #[test]
    fn test_remove_map_field_leaves_absent_map_absent() {
        let mut b = Builder::new(&PERSON);
        b.remove_map_field(4, "nope").unwrap();
        assert!(!b.has_field(4));
    }

    #[test]
    fn test_put_map_field_value_checks_key_kind() {
        let mut b = Builder::new(&PERSON);
        assert!(matches!(
            b.put_map_field_value(4, Value::F64(1.0), Value::Bool(true)),
            Err(FieldError::InvalidArgument { field: 4, .. })
        ));
        assert!(!b.has_field(4));

        b.put_map_field_value(4, Value::I64(-1), Value::Bool(true)).unwrap();
        assert_eq!(b.get_or_throw::<bool>(4, -1i64), Ok(true));
    }

    #[test]
    fn test_add_all_from_view_of_same_builder() {
        let mut b = person(&PERSON);
        let view = b.get_field_list::<i64>(3);

        b.add_all_repeated_field(5, view.iter().map(|r| r.unwrap())).unwrap();
        assert_eq!(b.get_field_list::<i64>(5).to_vec(), Ok(vec![1, 2, 3]));

        b.add_all_repeated_field(3, view.iter().map(|r| r.unwrap())).unwrap();
        assert_eq!(view.to_vec(), Ok(vec![1, 2, 3, 1, 2, 3]));
    }

    #[test]
    fn test_put_all_from_view_of_same_builder() {
        let mut b = person(&PERSON);
        b.put_map_field(4, "work", 2u32).unwrap();
        let view = b.get_field_map::<u32>(4);

        let keys = ["home", "work"];
        b.put_all_map_field(6, keys.into_iter().map(|k| (k, view.get(k).unwrap().unwrap() * 2)))
            .unwrap();
        b.put_all_map_field(4, keys.into_iter().map(|k| (k, view.get(k).unwrap().unwrap() + 10)))
            .unwrap();

        assert_eq!(b.get_or_throw::<u32>(6, "work"), Ok(4));
        assert_eq!(b.get_or_throw::<u32>(4, "home"), Ok(11));
        assert_eq!(b.get_or_throw::<u32>(4, "work"), Ok(12));
    }

    #[test]
    fn test_set_field_replaces_container() {
        let mut b = Builder::new(&PERSON);
        b.add_repeated_field(3, 1i64).unwrap();
        let view = b.get_field_list::<i64>(3);
        b.set_field(3, 9i64).unwrap();

        assert_eq!(b.get_field(3, 0i64), Ok(9));
        assert!(view.get(0).is_err());
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Field numbers
    // ═══════════════════════════════════════════════════════════════════════

    fn is_zero_rejected<T>(result: Result<T, FieldError>) -> bool {
        matches!(result, Err(FieldError::InvalidArgument { field: 0, .. }))
    }

    #[test]
    fn test_field_zero_is_rejected_by_writes() {
        for mode in [AccessMode::Checked, AccessMode::Unchecked] {
            let mut b = Builder::with_mode(&PERSON, mode);
            assert!(is_zero_rejected(b.set_field(0, 1i64).map(|_| ())));
            assert!(is_zero_rejected(b.set_field_for_enum(0, Level::High).map(|_| ())));
            assert!(is_zero_rejected(b.remove_field(0).map(|_| ())));
            assert!(is_zero_rejected(b.add_repeated_field(0, 1i64).map(|_| ())));
            assert!(is_zero_rejected(b.add_all_repeated_field(0, [1i64, 2]).map(|_| ())));
            assert!(is_zero_rejected(b.set_repeated_field(0, 0, 1i64).map(|_| ())));
            assert!(is_zero_rejected(b.put_map_field(0, "k", 1i64).map(|_| ())));
            assert!(is_zero_rejected(b.put_all_map_field(0, [("k", 1i64)]).map(|_| ())));
            assert!(is_zero_rejected(b.remove_map_field(0, "k").map(|_| ())));

            assert!(!b.has_field(0));
            assert_eq!(b.build(), Message::default_instance(&PERSON));
        }
    }

    #[test]
    fn test_field_zero_is_rejected_by_reads() {
        for mode in [AccessMode::Checked, AccessMode::Unchecked] {
            let b = Builder::with_mode(&PERSON, mode);
            assert!(is_zero_rejected(b.get_field(0, 0i64)));
            assert!(is_zero_rejected(b.get_field_for_enum(0, Level::Low, Level::Unrecognized)));
            assert!(is_zero_rejected(b.get_repeated_field::<i64>(0, 0)));
            assert!(is_zero_rejected(b.get_field_list::<i64>(0).get(0)));
            assert!(is_zero_rejected(b.get_or_throw::<i64>(0, "k")));
            assert!(is_zero_rejected(b.get_or_default(0, "k", 0i64)));
            assert!(is_zero_rejected(b.get_field_map::<i64>(0).get("k")));

            assert!(!b.has_field(0));
            assert_eq!(b.get_field_value(0), None);
            assert_eq!(b.get_repeated_field_count(0), 0);
            assert!(b.get_field_list::<i64>(0).is_empty());
        }
    }
}
