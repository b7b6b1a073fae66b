//! The built-in routing table for the COPD exacerbation study.
//!
//! Canonical data-type rules: Logistic Regression (plots and SHAP) only for
//! the imputed data types, since it cannot be fitted on records with missing
//! values; XGBoost (plots and SHAP) for every data type; comparison images
//! are fixed.

use super::table::{AssetGroup, AssetTemplate, Block, PageRoute, RoutingTable};
use crate::navigation::{DataType, Page, Section};
use crate::plan::TextBlock;

/// Data types Logistic Regression results exist for.
pub const LR_DATA_TYPES: [DataType; 2] = [DataType::Imputed, DataType::ImputedTransformed];

/// Data types XGBoost results exist for.
pub const XGB_DATA_TYPES: [DataType; 3] = DataType::ALL;

pub const EDA_ARCHIVE_NAME: &str = "EDA_images.zip";
pub const EDA_DIRECTORY: &str = "EDA";

impl Default for RoutingTable {
    fn default() -> Self {
        builtin_table()
    }
}

pub fn builtin_table() -> RoutingTable {
    RoutingTable {
        pages: vec![
            overview(),
            dashboard(),
            eda(),
            first_iteration(),
            final_methodology(),
        ],
    }
}

fn text(heading: &str, body: &str) -> Block {
    Block::Text(TextBlock::new(heading, body))
}

fn group(section: Option<Section>, intro: Option<TextBlock>, assets: Vec<AssetTemplate>) -> Block {
    Block::Assets(AssetGroup {
        section,
        intro,
        assets,
    })
}

fn overview() -> PageRoute {
    PageRoute {
        page: Page::Overview,
        title: "SMU FYP Team Synergy COPD Dashboard".into(),
        blocks: vec![
            Block::Text(TextBlock::body(
                "This dashboard displays visual results from Logistic Regression and XGBoost \
                 models on COPD data, comparing model performance across data types, along \
                 with feature importance visualizations.",
            )),
            text(
                "Study Aim",
                "The study predicts acute exacerbations of chronic obstructive pulmonary \
                 disease (COPD) from routinely collected patient records. Two model families \
                 are compared: an interpretable Logistic Regression baseline and a \
                 gradient-boosted XGBoost classifier.",
            ),
            text(
                "Data Types",
                "- **Raw Data**: records as extracted, with missing values left in place.\n\
                 - **Imputed Data**: missing values filled by multiple imputation.\n\
                 - **Imputed + Transformed Data**: imputed records with skewed features \
                 transformed and scaled.\n\n\
                 Logistic Regression cannot be fitted on records with missing values, so its \
                 results are shown for the imputed data types only.",
            ),
            text(
                "Navigating",
                "Use the sidebar to switch pages, pick a data type, and toggle the Logistic \
                 Regression, XGBoost, SHAP Analysis and Comparative Insights sections.",
            ),
        ],
    }
}

fn dashboard() -> PageRoute {
    PageRoute {
        page: Page::Dashboard,
        title: "Model Results".into(),
        blocks: vec![
            group(
                Some(Section::LogisticRegression),
                Some(TextBlock::new(
                    "1. Logistic Regression Visualizations",
                    "Logistic Regression is applied as an interpretable baseline. It needs \
                     complete records, so results exist for Imputed Data and Imputed + \
                     Transformed Data only.",
                )),
                vec![AssetTemplate::per_data_type(
                    "{folder}/LR_{token}.png",
                    "Logistic Regression for {label}",
                    &LR_DATA_TYPES,
                )],
            ),
            group(
                Some(Section::XGBoost),
                Some(TextBlock::new(
                    "2. XGBoost Visualizations",
                    "XGBoost is applied to every data type; gradient-boosted trees handle \
                     missing values natively.",
                )),
                vec![AssetTemplate::per_data_type(
                    "{folder}/XGB_{token}.png",
                    "XGBoost for {label}",
                    &XGB_DATA_TYPES,
                )],
            ),
            group(
                Some(Section::ShapAnalysis),
                Some(TextBlock::new(
                    "3. SHAP Visualisations",
                    "SHAP values attribute each prediction to the input features. Summary \
                     plots rank features by mean absolute contribution; force plots break \
                     down the prediction for a single patient.",
                )),
                vec![
                    AssetTemplate::per_data_type(
                        "SHAP/{folder}/SHAP_LR_{token}.png",
                        "SHAP Feature Importance for Logistic Regression on {label}",
                        &LR_DATA_TYPES,
                    ),
                    AssetTemplate::per_data_type(
                        "SHAP/{folder}/html/force_plot_LR.html",
                        "SHAP Force Plot for Logistic Regression on {label}",
                        &LR_DATA_TYPES,
                    )
                    .html(),
                    AssetTemplate::per_data_type(
                        "SHAP/{folder}/SHAP_XGB_{token}.png",
                        "SHAP Feature Importance for XGBoost on {label}",
                        &XGB_DATA_TYPES,
                    ),
                    AssetTemplate::per_data_type(
                        "SHAP/{folder}/html/force_plot_xgb.html",
                        "SHAP Force Plot for XGBoost on {label}",
                        &XGB_DATA_TYPES,
                    )
                    .html(),
                ],
            ),
            group(
                Some(Section::ComparativeInsights),
                Some(TextBlock::new(
                    "4. Comparative Visualizations",
                    "Side-by-side comparisons of the two initial models, and of the initial \
                     and final XGBoost models.",
                )),
                vec![
                    AssetTemplate::fixed(
                        "Comparisons/LR_vs_XGB_initial.png",
                        "Initial Comparison of Logistic Regression and XGBoost",
                    ),
                    AssetTemplate::fixed(
                        "Comparisons/XGBoost_final_vs_initial.png",
                        "Comparison of Initial and Final XGBoost Models",
                    ),
                ],
            ),
        ],
    }
}

fn eda() -> PageRoute {
    PageRoute {
        page: Page::Eda,
        title: "Exploratory Data Analysis".into(),
        blocks: vec![
            Block::Text(TextBlock::body(
                "Distributions and missingness of the study variables for each data type, \
                 followed by the class balance of the exacerbation outcome and the \
                 correlation structure of the raw features.",
            )),
            group(
                None,
                None,
                vec![
                    AssetTemplate::per_data_type(
                        "EDA/{folder}/feature_distributions_{token}.png",
                        "Feature Distributions for {label}",
                        &DataType::ALL,
                    ),
                    AssetTemplate::per_data_type(
                        "EDA/{folder}/missing_values_{token}.png",
                        "Missing Values for {label}",
                        &DataType::ALL,
                    ),
                ],
            ),
            group(
                None,
                Some(TextBlock::new(
                    "Outcome and Correlations",
                    "Exacerbation events are the minority class, which motivates the recall \
                     focus of the final methodology.",
                )),
                vec![
                    AssetTemplate::fixed("EDA/class_balance.png", "Exacerbation Class Balance"),
                    AssetTemplate::fixed(
                        "EDA/correlation_heatmap.png",
                        "Correlation Heatmap of Raw Features",
                    ),
                ],
            ),
            Block::Download {
                label: "Download all EDA images".into(),
                directory: EDA_DIRECTORY.into(),
                archive_name: EDA_ARCHIVE_NAME.into(),
            },
        ],
    }
}

fn first_iteration() -> PageRoute {
    PageRoute {
        page: Page::FirstIteration,
        title: "First Iteration".into(),
        blocks: vec![
            Block::Text(TextBlock::body(
                "The first iteration trains both models with default hyperparameters and no \
                 feature selection. It is the baseline the final methodology improves on.",
            )),
            group(
                Some(Section::LogisticRegression),
                Some(TextBlock::new(
                    "Logistic Regression Baseline",
                    "Logistic Regression is applied with default regularisation to the \
                     imputed data types.",
                )),
                vec![AssetTemplate::per_data_type(
                    "FirstIteration/{folder}/LR_{token}.png",
                    "First-Iteration Logistic Regression for {label}",
                    &LR_DATA_TYPES,
                )],
            ),
            group(
                Some(Section::XGBoost),
                Some(TextBlock::new(
                    "XGBoost Baseline",
                    "XGBoost is applied with default hyperparameters to every data type.",
                )),
                vec![AssetTemplate::per_data_type(
                    "FirstIteration/{folder}/XGB_{token}.png",
                    "First-Iteration XGBoost for {label}",
                    &XGB_DATA_TYPES,
                )],
            ),
            group(
                Some(Section::ComparativeInsights),
                None,
                vec![AssetTemplate::fixed(
                    "Comparisons/LR_vs_XGB_initial.png",
                    "Initial Comparison of Logistic Regression and XGBoost",
                )],
            ),
        ],
    }
}

fn final_methodology() -> PageRoute {
    PageRoute {
        page: Page::FinalMethodology,
        title: "Final Methodology".into(),
        blocks: vec![
            Block::Text(TextBlock::body(
                "The final model is an XGBoost classifier tuned with stratified \
                 cross-validation and class weighting to improve recall on exacerbation \
                 events.",
            )),
            group(
                Some(Section::XGBoost),
                Some(TextBlock::new(
                    "Final XGBoost Model",
                    "XGBoost is applied with the tuned hyperparameters to every data type.",
                )),
                vec![AssetTemplate::per_data_type(
                    "FinalMethodology/{folder}/XGB_final_{token}.png",
                    "Final XGBoost for {label}",
                    &XGB_DATA_TYPES,
                )],
            ),
            group(
                Some(Section::ShapAnalysis),
                Some(TextBlock::new(
                    "Final Model Explanations",
                    "SHAP attributions for the tuned XGBoost model.",
                )),
                vec![
                    AssetTemplate::per_data_type(
                        "FinalMethodology/{folder}/SHAP_XGB_final_{token}.png",
                        "SHAP Feature Importance for Final XGBoost on {label}",
                        &XGB_DATA_TYPES,
                    ),
                    AssetTemplate::per_data_type(
                        "FinalMethodology/{folder}/html/force_plot_xgb.html",
                        "SHAP Force Plot for Final XGBoost on {label}",
                        &XGB_DATA_TYPES,
                    )
                    .html(),
                ],
            ),
            group(
                Some(Section::ComparativeInsights),
                None,
                vec![AssetTemplate::fixed(
                    "Comparisons/XGBoost_final_vs_initial.png",
                    "Comparison of Initial and Final XGBoost Models",
                )],
            ),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_table_is_valid() {
        builtin_table().validate().unwrap();
    }

    #[test]
    fn every_page_is_routed_once_in_sidebar_order() {
        assert_eq!(builtin_table().routed_pages(), Page::ALL.to_vec());
    }

    #[test]
    fn eda_page_offers_archive() {
        let table = builtin_table();
        let route = table.route(Page::Eda).unwrap();
        let has_download = route.blocks.iter().any(|b| {
            matches!(b, Block::Download { archive_name, .. } if archive_name == EDA_ARCHIVE_NAME)
        });
        assert!(has_download);
    }
}
