pub(crate) fn is_false(value: &bool) -> bool {
    !*value
}
