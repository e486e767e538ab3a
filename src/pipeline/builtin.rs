// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 mlpipe contributors

//! Built-in fraud detection pipeline
//!
//! Used when no pipeline file exists, and written out by `mlpipe init`.

use super::{Pipeline, Step, StepCommand};

/// Default pipeline name
pub const DEFAULT_NAME: &str = "fraud-detection";

/// Interpreter used when none is configured
pub const DEFAULT_PYTHON: &str = "python";

/// ETL, training and deployment, in that order
///
/// Paths are relative to the project root. The ETL job writes
/// `data/processed/users.parquet`; training writes
/// `models/fraud_detection_model.joblib`, which the Terraform step uploads.
pub fn ml_pipeline(python: &str) -> Pipeline {
    let mut pipeline = Pipeline::new(DEFAULT_NAME)
        .with_step(
            Step::new(
                "Running Spark data processing job",
                StepCommand::exec(python, ["data_processing/spark_jobs/spark_etl.py"]),
            )
            .with_env("PYSPARK_PYTHON", python),
        )
        .with_step(Step::new(
            "Training the fraud detection model",
            StepCommand::exec(python, ["model_training/train_model.py"]),
        ))
        .with_step(
            Step::new(
                "Deploying model to S3 via Terraform",
                StepCommand::exec("terraform", ["apply", "-auto-approve"]),
            )
            .with_working_dir("deployment/terraform")
            .with_env("TF_IN_AUTOMATION", "1"),
        );

    pipeline.description =
        Some("Transform raw data with Spark, train the fraud model, deploy it with Terraform".into());
    pipeline
}
