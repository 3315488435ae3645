/// Splits a sequence into maximal runs of items sharing the same key.
pub fn group_adjacent<T, K, F>(items: impl Iterator<Item = T>, key_selector: F) -> Vec<Vec<T>>
where
    K: Eq,
    F: Fn(&T) -> K,
{
    let mut result: Vec<Vec<T>> = Vec::new();
    let mut current_group: Option<(K, Vec<T>)> = None;

    for item in items {
        let key = key_selector(&item);

        match &mut current_group {
            Some((current_key, group)) if *current_key == key => {
                group.push(item);
            }
            _ => {
                if let Some((_, group)) = current_group.take() {
                    result.push(group);
                }
                current_group = Some((key, vec![item]));
            }
        }
    }

    if let Some((_, group)) = current_group {
        result.push(group);
    }

    result
}
