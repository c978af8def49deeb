use dynarray::{dynarray, DynamicArray};

#[test]
fn test_insert_in_middle_with_spare_capacity() {
    let mut array = dynarray![1, 2, 4];
    array.reserve(8);
    let data = array.as_ptr();

    let at = array.insert(2, 3);

    assert_eq!(at, 2);
    assert_eq!(array, [1, 2, 3, 4]);
    assert_eq!(array.as_ptr(), data);
}

#[test]
fn test_insert_when_full_grows() {
    let mut array = dynarray![1, 3];

    let at = array.insert(1, 2);

    assert_eq!(at, 1);
    assert_eq!(array, [1, 2, 3]);
    assert_eq!(array.capacity(), 4);
}

#[test]
fn test_insert_at_front_and_end() {
    let mut array = DynamicArray::new();

    assert_eq!(array.insert(0, "b"), 0);
    assert_eq!(array.insert(0, "a"), 0);
    assert_eq!(array.insert(2, "c"), 2);

    assert_eq!(array, ["a", "b", "c"]);
}

#[test]
#[should_panic(expected = "Insertion index 4 out of bounds for array of length 3")]
fn test_insert_past_end_panics() {
    let mut array = dynarray![1, 2, 3];
    array.insert(4, 0);
}

#[test]
fn test_erase_returns_following_position() {
    let mut array = dynarray![10, 20, 30, 40];

    let next = array.erase(1);

    assert_eq!(next, 1);
    assert_eq!(array[next], 30);
    assert_eq!(array, [10, 30, 40]);
    assert_eq!(array.capacity(), 4);
}

#[test]
fn test_erase_last_returns_len() {
    let mut array = dynarray![1, 2, 3];

    let next = array.erase(2);

    assert_eq!(next, array.len());
    assert_eq!(array, [1, 2]);
}

#[test]
#[should_panic(expected = "Index 3 out of bounds for array of length 3")]
fn test_erase_at_end_panics() {
    let mut array = dynarray![1, 2, 3];
    array.erase(3);
}

#[test]
fn test_remove_returns_value() {
    let mut array = dynarray![String::from("a"), String::from("b"), String::from("c")];

    let removed = array.remove(0);

    assert_eq!(removed, "a");
    assert_eq!(array, ["b", "c"]);
}

#[test]
fn test_insert_then_erase_is_identity() {
    let original = dynarray![5, 6, 7, 8];

    for position in 0..=original.len() {
        let mut array = original.clone();
        let at = array.insert(position, 99);
        array.erase(at);
        assert_eq!(array, original);
    }
}

#[test]
fn test_erase_every_element_from_front() {
    let mut array: DynamicArray<i32> = (0..6).collect();
    let mut position = 0;

    while !array.is_empty() {
        position = array.erase(position);
    }

    assert_eq!(position, 0);
    assert_eq!(array.capacity(), 6);
}
