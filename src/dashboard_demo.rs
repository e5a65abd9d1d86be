// Dashboard demo - end-to-end walkthrough of the grid engine: build a
// dashboard, then drag, resize, add and remove widgets, printing the grid
// after every step.

use metric_grid::{
    add_widget, initialize_grid, move_widget, refresh_entries, remove_widget, render_grid,
    resize_widget, Breakpoint, ChartType, DashboardEntry, DisplayOptions, Position, WidgetData,
    WidgetSize,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let widgets = vec![
        WidgetData {
            title: "Monthly Revenue".to_string(),
            chart_type: ChartType::Bar,
            goal: Some(120_000.0),
            value: Some(87_500.0),
            size: WidgetSize::Large,
        },
        WidgetData {
            title: "Active Users".to_string(),
            chart_type: ChartType::Line,
            goal: None,
            value: Some(1_412.0),
            size: WidgetSize::Small,
        },
        WidgetData {
            title: "Signups by Plan".to_string(),
            chart_type: ChartType::Pie,
            goal: None,
            value: None,
            size: WidgetSize::Medium,
        },
        WidgetData {
            title: "Churn Overview".to_string(),
            chart_type: ChartType::Table,
            goal: Some(2.0),
            value: Some(3.1),
            size: WidgetSize::Small,
        },
    ];

    let display = DisplayOptions::default();

    println!("Initializing dashboard at lg (3 columns)");
    let init = initialize_grid(&widgets, Breakpoint::Lg)?;
    let mut grid = init.grid;
    let mut entries = init.entries;
    println!("{}", render_grid(&grid, &display));

    println!("Dragging 'Active Users' onto 'Monthly Revenue' - footprints swap");
    entries = move_widget(2, Position::new(0, 0), &entries, &mut grid)?;
    println!("{}", render_grid(&grid, &display));

    println!("Resizing 'Signups by Plan' to large");
    entries = resize_widget(3, WidgetSize::Large, &entries, &mut grid, Breakpoint::Lg)?;
    println!("{}", render_grid(&grid, &display));

    println!("Dropping a new widget into the first empty slot");
    let slot = entries
        .iter()
        .position(|entry| entry.item_id().is_none())
        .unwrap_or(0);
    let fresh = WidgetData {
        title: "Support Tickets".to_string(),
        chart_type: ChartType::Table,
        goal: None,
        value: Some(18.0),
        size: WidgetSize::Small,
    };
    entries = add_widget(fresh, slot, &entries, &mut grid)?;
    println!("{}", render_grid(&grid, &display));

    println!("Removing 'Churn Overview'");
    entries = remove_widget(4, &entries, &mut grid)?;
    println!("{}", render_grid(&grid, &display));

    println!("Window grew to xl - reconciling to 4 columns");
    grid.reconcile(Some(Breakpoint::Xl.col_count()))?;
    entries = refresh_entries(&entries, &grid)?;
    println!("{}", render_grid(&grid, &display));

    println!("Final render order:");
    for entry in &entries {
        if let DashboardEntry::Widget {
            item_id,
            scale,
            position,
            widget,
        } = entry
        {
            println!(
                "  #{} {} at {} as {} ({})",
                item_id, widget.title, position, scale, widget.size
            );
        }
    }

    Ok(())
}
