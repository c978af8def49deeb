use dynarray::{dynarray, DynArrayError, DynamicArray};

#[test]
fn test_at_checks_bounds() {
    let array = dynarray![1, 2, 3];

    assert_eq!(array.at(2), Ok(&3));
    assert_eq!(
        array.at(3).unwrap_err(),
        DynArrayError::IndexOutOfRange {
            index: 3,
            length: 3
        }
    );
    assert_eq!(
        array.at(4).unwrap_err(),
        DynArrayError::IndexOutOfRange {
            index: 4,
            length: 3
        }
    );
}

#[test]
fn test_at_on_empty_array() {
    let array: DynamicArray<u8> = DynamicArray::new();

    assert_eq!(
        array.at(0).unwrap_err(),
        DynArrayError::IndexOutOfRange {
            index: 0,
            length: 0
        }
    );
}

#[test]
fn test_at_mut_modifies_element() {
    let mut array = dynarray![1, 2, 3];

    *array.at_mut(1).unwrap() = 20;

    assert_eq!(array, [1, 20, 3]);
    assert!(array.at_mut(3).is_err());
}

#[test]
fn test_at_after_shrinking_resize() {
    let mut array = dynarray![1, 2, 3];
    array.resize(1);

    assert!(array.at(1).is_err());
    assert_eq!(array.at(0), Ok(&1));
}

#[test]
#[should_panic]
fn test_unchecked_index_past_len_panics() {
    let mut array = dynarray![1, 2, 3];
    array.truncate(1);
    let _ = array[1];
}

#[test]
fn test_try_reserve_out_of_memory_keeps_state() {
    let mut array = dynarray![1u64, 2, 3];

    let result = array.try_reserve(usize::MAX);

    assert_eq!(
        result.unwrap_err(),
        DynArrayError::OutOfMemory { slots: usize::MAX }
    );
    assert_eq!(array, [1, 2, 3]);
    assert_eq!(array.capacity(), 3);
}

#[test]
fn test_try_reserve_allocator_refusal_keeps_state() {
    let mut array = dynarray![1u64, 2, 3];
    let data = array.as_ptr();
    let slots = isize::MAX as usize / 8;

    let result = array.try_reserve(slots);

    assert_eq!(result.unwrap_err(), DynArrayError::OutOfMemory { slots });
    assert_eq!(array.as_ptr(), data);
    assert_eq!(array, [1, 2, 3]);
}

#[test]
fn test_try_resize_out_of_memory_keeps_state() {
    let mut array = dynarray![1u32, 2];

    assert!(array.try_resize(usize::MAX).is_err());

    assert_eq!(array, [1, 2]);
    assert_eq!(array.capacity(), 2);
}

#[test]
fn test_try_operations_succeed_normally() {
    let mut array = DynamicArray::new();

    array.try_push_back(1).unwrap();
    assert_eq!(array.try_insert(0, 0).unwrap(), 0);
    array.try_reserve(8).unwrap();
    array.try_resize(4).unwrap();
    array.try_shrink_to_fit().unwrap();

    assert_eq!(array, [0, 1, 0, 0]);
    assert_eq!(array.capacity(), 4);
}

#[test]
fn test_try_with_capacity_request_out_of_memory() {
    let result = DynamicArray::<u64>::try_with_capacity_request(dynarray::reserve(usize::MAX));

    assert_eq!(
        result.unwrap_err(),
        DynArrayError::OutOfMemory { slots: usize::MAX }
    );
}

#[test]
#[should_panic(expected = "capacity overflow")]
fn test_reserve_overflow_panics() {
    let mut array: DynamicArray<u64> = DynamicArray::new();
    array.reserve(usize::MAX);
}

#[test]
fn test_error_messages_quality() {
    let message = format!(
        "{}",
        DynArrayError::IndexOutOfRange {
            index: 5,
            length: 2
        }
    );
    assert!(message.contains("index 5"));
    assert!(message.contains("length 2"));

    let message = format!("{}", DynArrayError::OutOfMemory { slots: 64 });
    assert!(message.contains("64 slots"));
}

#[test]
fn test_error_types_implement_standard_traits() {
    let error = DynArrayError::OutOfMemory { slots: 1 };

    let debug_str = format!("{:?}", error);
    assert!(!debug_str.is_empty());

    let cloned = error.clone();
    assert_eq!(error, cloned);
    assert_ne!(
        error,
        DynArrayError::IndexOutOfRange {
            index: 0,
            length: 0
        }
    );

    let _: &dyn std::error::Error = &error;
}
