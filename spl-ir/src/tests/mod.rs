// IR unit tests

mod test_transform;
