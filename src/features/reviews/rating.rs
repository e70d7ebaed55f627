/// Running rating aggregate for a listing. The sum and count are the
/// source of truth; the displayed rating is derived from them and rounded
/// to two decimals.
#[derive(Clone, Copy, PartialEq, Debug, Default)]
pub struct RatingAggregate {
    pub rating_sum: i32,
    pub review_count: i32,
    pub rating: f64,
}

impl RatingAggregate {
    pub fn new(rating_sum: i32, review_count: i32) -> Self {
        let mut aggregate = Self {
            rating_sum,
            review_count,
            rating: 0.0,
        };
        aggregate.recompute();
        aggregate
    }

    pub fn apply_create(&mut self, rating: i32) {
        self.rating_sum += rating;
        self.review_count += 1;
        self.recompute();
    }

    pub fn apply_rating_change(&mut self, old_rating: i32, new_rating: i32) {
        self.rating_sum += new_rating - old_rating;
        self.recompute();
    }

    pub fn apply_delete(&mut self, rating: i32) {
        self.rating_sum -= rating;
        self.review_count -= 1;
        self.recompute();
    }

    fn recompute(&mut self) {
        self.rating = if self.review_count == 0 {
            0.0
        } else {
            round2(f64::from(self.rating_sum) / f64::from(self.review_count))
        };
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn two_reviews_average_cleanly() {
        let mut aggregate = RatingAggregate::default();
        aggregate.apply_create(4);
        aggregate.apply_create(5);
        assert_eq!(aggregate.rating_sum, 9);
        assert_eq!(aggregate.review_count, 2);
        assert_eq!(aggregate.rating, 4.5);
    }

    #[test]
    fn average_is_rounded_to_two_decimals() {
        let aggregate = RatingAggregate::new(14, 3);
        assert_eq!(aggregate.rating, 4.67);
    }

    #[test]
    fn new_review_folds_into_existing_aggregate() {
        let mut aggregate = RatingAggregate::new(4, 1);
        aggregate.apply_create(5);
        assert_eq!(aggregate.rating_sum, 9);
        assert_eq!(aggregate.review_count, 2);
        assert_eq!(aggregate.rating, 4.5);
    }

    #[test]
    fn rating_change_keeps_the_count() {
        let mut aggregate = RatingAggregate::new(9, 2);
        aggregate.apply_rating_change(5, 2);
        assert_eq!(aggregate.rating_sum, 6);
        assert_eq!(aggregate.review_count, 2);
        assert_eq!(aggregate.rating, 3.0);
    }

    #[test]
    fn create_then_delete_restores_the_aggregate() {
        let mut aggregate = RatingAggregate::new(9, 2);
        let before = aggregate;
        aggregate.apply_create(3);
        aggregate.apply_delete(3);
        assert_eq!(aggregate, before);
    }

    #[test]
    fn retracting_one_authors_ratings_leaves_the_rest() {
        // Three reviews (5, 4, 3); the author of the 5 and the 3 leaves.
        let mut aggregate = RatingAggregate::new(12, 3);
        for rating in [5, 3] {
            aggregate.apply_delete(rating);
        }
        assert_eq!(aggregate.rating_sum, 4);
        assert_eq!(aggregate.review_count, 1);
        assert_eq!(aggregate.rating, 4.0);
    }

    #[test]
    fn deleting_the_last_review_zeroes_the_rating() {
        let mut aggregate = RatingAggregate::new(5, 1);
        aggregate.apply_delete(5);
        assert_eq!(aggregate, RatingAggregate::default());
    }
}
