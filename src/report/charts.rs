//! ECharts configuration for the spending trend chart.

use charming::{
    Chart,
    component::{Axis, Grid, Title},
    element::{
        AreaStyle, AxisLabel, AxisPointer, AxisPointerType, AxisType, JsFunction, Tooltip,
        Trigger,
    },
    series::Line,
};
use maud::{Markup, PreEscaped, html};

use crate::report::{Granularity, PeriodTotal};

/// The HTML element ID of the spending chart container.
pub(super) const SPENDING_CHART_ID: &str = "spending-chart-canvas";

/// Build the spending trend chart for `periods`.
pub(super) fn spending_chart(periods: &[PeriodTotal], granularity: Granularity) -> Chart {
    let labels: Vec<String> = periods
        .iter()
        .map(|period| period.period_label.clone())
        .collect();
    let values: Vec<f64> = periods.iter().map(|period| period.total).collect();

    let subtitle = match granularity {
        Granularity::Day => "Last 30 days",
        Granularity::Month => "Last twelve months",
        Granularity::Year => "Last five years",
    };

    Chart::new()
        .title(Title::new().text("Spending").subtext(subtitle))
        .tooltip(currency_tooltip())
        .grid(
            Grid::new()
                .left("3%")
                .right("4%")
                .bottom("3%")
                .contain_label(true),
        )
        .x_axis(Axis::new().type_(AxisType::Category).data(labels))
        .y_axis(
            Axis::new()
                .type_(AxisType::Value)
                .axis_label(AxisLabel::new().formatter(currency_formatter())),
        )
        .series(
            Line::new()
                .name("Expenses")
                .area_style(AreaStyle::new())
                .data(values),
        )
}

/// Render the chart container and the script that draws `chart` into it.
///
/// The script runs inline so the chart is drawn both on the first page load
/// and when the fragment is swapped in by HTMX.
pub(super) fn chart_view(chart: &Chart) -> Markup {
    let script = format!(
        r#"(function() {{
            const chartDom = document.getElementById("{SPENDING_CHART_ID}");
            const chart = echarts.init(chartDom);
            chart.setOption({});

            window.addEventListener('resize', chart.resize);

            const darkModeMediaQuery = window.matchMedia('(prefers-color-scheme: dark)');
            const updateTheme = () => {{
                chart.setTheme(darkModeMediaQuery.matches ? 'dark' : 'default');
            }};
            darkModeMediaQuery.addEventListener('change', updateTheme);
            updateTheme();
        }})();"#,
        chart
    );

    html!(
        div
            id=(SPENDING_CHART_ID)
            class="min-h-[380px] rounded dark:bg-gray-100"
        {}

        script { (PreEscaped(script)) }
    )
}

fn currency_formatter() -> JsFunction {
    JsFunction::new_with_args(
        "number",
        "const currencyFormatter = new Intl.NumberFormat('en-US', {
              style: 'currency',
              currency: 'USD'
            });
            return (number) ? currencyFormatter.format(number) : \"-\";",
    )
}

fn currency_tooltip() -> Tooltip {
    Tooltip::new()
        .trigger(Trigger::Axis)
        .value_formatter(currency_formatter())
        .axis_pointer(AxisPointer::new().type_(AxisPointerType::Shadow))
}
