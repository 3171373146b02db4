use storefront_csp::{AllowList, BaselinePolicy, CspAugmenter};

fn main() {
    println!("Storefront CSP Augmenter Example");

    let baseline = BaselinePolicy::new();
    let policy = baseline.generate();

    let augmenter = CspAugmenter::new(AllowList::storefront_default());
    let outcome = augmenter.augment_outcome(&policy.header);

    println!("Baseline header:\n  {}", policy.header);
    println!("Augmented header:\n  {}", outcome.header());
    println!("Nonce tokens stripped: {}", outcome.removed_nonces());
}
