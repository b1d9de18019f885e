use churn_classifiers::config::{ModelConfig, ModelType};
use churn_classifiers::data_handling::train_test_split;
use churn_classifiers::labels::synthesize_labels;
use churn_classifiers::metrics::ClassificationMetrics;
use churn_classifiers::models::factory::build_model;
use churn_classifiers::preprocessing::encode_features;
use churn_classifiers::synthetic::generate_dataset;

fn main() {
    env_logger::init();

    // 1000 synthetic customers, same seeds as the full comparison
    let customers = generate_dataset(42, 1000).expect("failed to generate customers");
    let labeled = synthesize_labels(customers, 43).expect("failed to label customers");
    let (encoded, encoders) = encode_features(&labeled).expect("failed to encode features");

    println!("Encoded X shape: {:?}", encoded.x.shape());
    println!("Contract classes: {:?}", encoders.contract.classes());
    println!("Churn rate: {:.3}", labeled.churn_rate());

    let split = train_test_split(&encoded, 0.2, 42).expect("failed to split");

    // Fewer boosting rounds than the default roster for speed
    let params = ModelConfig::new(
        0.1,
        42,
        ModelType::GBDT {
            max_depth: 3,
            num_boost_round: 30,
            debug: false,
            training_optimization_level: 2,
            loss_type: "LogLikelyhood".to_string(),
        },
    );

    let mut clf = build_model(&params);
    clf.fit(&split.x_train, &split.y_train).expect("training failed");
    let preds = clf.predict(&split.x_test).expect("prediction failed");

    let metrics =
        ClassificationMetrics::from_labels(&split.y_test, &preds).expect("metrics failed");
    println!("{} test metrics: {:?}", clf.name(), metrics);
}
