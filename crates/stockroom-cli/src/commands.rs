//! CLI commands

use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{bail, Result};
use chrono::NaiveDate;
use clap::builder::PossibleValuesParser;
use clap::{Args, Subcommand};
use serde::Serialize;
use stockroom_core::models::query::DEFAULT_PAGE_LIMIT;
use stockroom_core::models::{
    AkunFilter, AkunPayload, AkunType, CategoryPayload, CreatePurchasePayload,
    CreateQuotationPayload, CreateStockMovementPayload, CreateUserPayload, LineItemPayload,
    ListQuery, MovementType, Paginated, ProductFilter, ProductPayload, PurchaseFilter,
    QuotationFilter, ReportKind, ReportParams, SortOrder, StockMovementFilter, StorePayload,
    TimeFilter, PURCHASE_STATUSES, QUOTATION_STATUSES, REPORT_PERIODS,
};
use stockroom_core::utils::{capitalize_first, format_currency, format_date, format_number};
use stockroom_core::{ApiClient, Config};
use tracing::{info, warn};

use crate::output::{self, currency_str, opt, Table};

/// State shared by every command.
pub struct CommandContext {
    pub client: ApiClient,
    pub config: Config,
    /// Print raw JSON instead of tables.
    pub json: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Sign in and store the session tokens
    Login {
        /// Account email (defaults to the last one used)
        #[arg(long)]
        email: Option<String>,
    },

    /// Sign out and forget the stored tokens
    Logout,

    /// Show the signed-in user
    Whoami,

    /// Change the signed-in user's display name
    UpdateProfile { fullname: String },

    /// Create another console user (prompts for the password)
    CreateUser { email: String, fullname: String },

    /// Headline counts and totals for a time window
    Dashboard {
        /// today, yesterday, last_7_days, last_30_days, this_month, last_month, this_year
        #[arg(long, default_value = "last_7_days")]
        period: TimeFilter,
    },

    /// Product categories
    Categories {
        #[command(subcommand)]
        command: CategoryCommands,
    },

    /// Stores and warehouses
    Stores {
        #[command(subcommand)]
        command: StoreCommands,
    },

    /// Product catalog
    Products {
        #[command(subcommand)]
        command: ProductCommands,
    },

    /// Stock movements in and out of stores
    Stock {
        #[command(subcommand)]
        command: StockCommands,
    },

    /// Customer quotations
    Quotations {
        #[command(subcommand)]
        command: QuotationCommands,
    },

    /// Supplier purchases
    Purchases {
        #[command(subcommand)]
        command: PurchaseCommands,
    },

    /// Customers and suppliers
    Akuns {
        #[command(subcommand)]
        command: AkunCommands,
    },

    /// Download a PDF report
    Report {
        /// inventory, purchases, quotations or stock-movements
        kind: ReportKind,

        #[arg(long, default_value = "this_month", value_parser = PossibleValuesParser::new(REPORT_PERIODS.iter().copied()))]
        period: String,

        /// Start of a custom range (requires --to)
        #[arg(long, requires = "to")]
        from: Option<NaiveDate>,

        /// End of a custom range (requires --from)
        #[arg(long, requires = "from")]
        to: Option<NaiveDate>,

        #[arg(long)]
        store: Option<String>,

        #[arg(long)]
        category: Option<String>,

        #[arg(long)]
        product: Option<String>,

        #[arg(long = "type")]
        movement_type: Option<MovementType>,

        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

/// Paging, search and sort options shared by every `list` command.
#[derive(Args, Debug, Clone)]
pub struct ListArgs {
    #[arg(long, default_value_t = 1)]
    page: u32,

    #[arg(long, default_value_t = DEFAULT_PAGE_LIMIT)]
    limit: u32,

    #[arg(short, long)]
    search: Option<String>,

    /// Column to sort by
    #[arg(long)]
    sort: Option<String>,

    /// Sort descending
    #[arg(long, requires = "sort")]
    desc: bool,
}

impl ListArgs {
    fn query(&self) -> ListQuery {
        let mut query = ListQuery::page(self.page).limit(self.limit);
        if let Some(term) = &self.search {
            query = query.search(term.clone());
        }
        if let Some(column) = &self.sort {
            let order = if self.desc {
                SortOrder::Desc
            } else {
                SortOrder::Asc
            };
            query = query.sort(column.clone(), order);
        }
        query
    }
}

#[derive(Subcommand)]
pub enum CategoryCommands {
    List(ListArgs),
    Show { id: String },
    Create {
        name: String,
        #[arg(long, default_value = "")]
        description: String,
    },
    Update {
        id: String,
        name: String,
        #[arg(long, default_value = "")]
        description: String,
    },
    Delete { id: String },
}

#[derive(Args, Debug, Clone)]
pub struct StoreArgs {
    name: String,
    #[arg(long, default_value = "")]
    location: String,
    #[arg(long, default_value = "")]
    description: String,
    #[arg(long, default_value = "")]
    manager: String,
    #[arg(long, default_value = "")]
    contact: String,
    #[arg(long, default_value = "")]
    phone: String,
    #[arg(long, default_value = "")]
    email: String,
    #[arg(long, default_value = "")]
    address: String,
}

impl StoreArgs {
    fn payload(self, id: Option<String>) -> StorePayload {
        StorePayload {
            id,
            name: self.name,
            location: self.location,
            description: self.description,
            manager: self.manager,
            contact_info: self.contact,
            phone: self.phone,
            email: self.email,
            address: self.address,
        }
    }
}

#[derive(Subcommand)]
pub enum StoreCommands {
    List(ListArgs),
    Show { id: String },
    Create(StoreArgs),
    Update {
        id: String,
        #[command(flatten)]
        store: StoreArgs,
    },
    Delete { id: String },
}

#[derive(Args, Debug, Clone)]
pub struct ProductArgs {
    name: String,
    #[arg(long)]
    category: String,
    #[arg(long)]
    price_sell: String,
    #[arg(long)]
    price_cost: String,
    /// Unit of measure
    #[arg(long, default_value = "pcs")]
    unit: String,
    #[arg(long, default_value = "")]
    description: String,
    #[arg(long)]
    sku: Option<String>,
}

impl ProductArgs {
    fn payload(self, id: Option<String>) -> ProductPayload {
        ProductPayload {
            id,
            name: self.name,
            description: self.description,
            category_id: self.category,
            price_sell: self.price_sell,
            price_cost: self.price_cost,
            satuan: self.unit,
            sku: self.sku,
        }
    }
}

#[derive(Subcommand)]
pub enum ProductCommands {
    List {
        #[command(flatten)]
        list: ListArgs,
        #[arg(long)]
        category: Option<String>,
    },
    Show { id: String },
    Create(ProductArgs),
    Update {
        id: String,
        #[command(flatten)]
        product: ProductArgs,
    },
    Delete { id: String },
}

#[derive(Subcommand)]
pub enum StockCommands {
    List {
        #[command(flatten)]
        list: ListArgs,
        #[arg(long)]
        store: Option<String>,
        #[arg(long)]
        product: Option<String>,
        #[arg(long = "type")]
        movement_type: Option<MovementType>,
        #[arg(long)]
        from: Option<NaiveDate>,
        #[arg(long)]
        to: Option<NaiveDate>,
    },
    Show { id: i64 },
    /// Record stock coming in or going out
    Record {
        #[arg(long)]
        product: String,
        #[arg(long)]
        store: String,
        #[arg(long)]
        quantity: u32,
        #[arg(long = "type")]
        movement_type: MovementType,
        #[arg(long)]
        note: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum QuotationCommands {
    List {
        #[command(flatten)]
        list: ListArgs,
        #[arg(long, value_parser = PossibleValuesParser::new(QUOTATION_STATUSES.iter().copied()))]
        status: Option<String>,
        #[arg(long)]
        from: Option<NaiveDate>,
        #[arg(long)]
        to: Option<NaiveDate>,
    },
    Show { id: i64 },
    Create {
        #[arg(long)]
        customer: i64,
        #[arg(long)]
        store: i64,
        /// Defaults to today
        #[arg(long)]
        date: Option<NaiveDate>,
        /// Line item as PRODUCT_ID:QUANTITY:UNIT_PRICE, repeatable
        #[arg(long = "item", required = true, value_parser = parse_line_item)]
        items: Vec<LineItemPayload>,
        #[arg(long)]
        discount: Option<f64>,
        #[arg(long)]
        notes: Option<String>,
    },
    Status {
        id: i64,
        #[arg(value_parser = PossibleValuesParser::new(QUOTATION_STATUSES.iter().copied()))]
        status: String,
    },
    Pdf {
        id: i64,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
pub enum PurchaseCommands {
    List {
        #[command(flatten)]
        list: ListArgs,
        #[arg(long, value_parser = PossibleValuesParser::new(PURCHASE_STATUSES.iter().copied()))]
        status: Option<String>,
        #[arg(long)]
        payment_status: Option<String>,
        #[arg(long)]
        from: Option<NaiveDate>,
        #[arg(long)]
        to: Option<NaiveDate>,
    },
    Show { id: i64 },
    Create {
        #[arg(long)]
        supplier: i64,
        #[arg(long)]
        store: i64,
        /// Defaults to today
        #[arg(long)]
        date: Option<NaiveDate>,
        #[arg(long)]
        due: NaiveDate,
        /// Line item as PRODUCT_ID:QUANTITY:UNIT_PRICE, repeatable
        #[arg(long = "item", required = true, value_parser = parse_line_item)]
        items: Vec<LineItemPayload>,
        #[arg(long)]
        tax: Option<f64>,
        #[arg(long)]
        discount: Option<f64>,
        #[arg(long)]
        notes: Option<String>,
    },
    Status {
        id: i64,
        #[arg(value_parser = PossibleValuesParser::new(PURCHASE_STATUSES.iter().copied()))]
        status: String,
    },
    /// Set the payment status, e.g. paid or unpaid
    Payment { id: i64, status: String },
    Pdf {
        id: i64,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Args, Debug, Clone)]
pub struct AkunArgs {
    name: String,
    #[arg(long = "type")]
    akun_type: AkunType,
    #[arg(long, default_value = "")]
    phone: String,
    #[arg(long, default_value = "")]
    email: String,
    #[arg(long, default_value = "")]
    address: String,
}

impl AkunArgs {
    fn payload(self, id: Option<i64>) -> AkunPayload {
        AkunPayload {
            id,
            name: self.name,
            akun_type: self.akun_type,
            phone: self.phone,
            email: self.email,
            address: self.address,
        }
    }
}

#[derive(Subcommand)]
pub enum AkunCommands {
    List {
        #[command(flatten)]
        list: ListArgs,
        #[arg(long = "type")]
        akun_type: Option<AkunType>,
    },
    Show { id: i64 },
    Create(AkunArgs),
    Update {
        id: i64,
        #[command(flatten)]
        akun: AkunArgs,
    },
    Delete { id: i64 },
}

/// Parse `PRODUCT_ID:QUANTITY:UNIT_PRICE`.
pub fn parse_line_item(raw: &str) -> Result<LineItemPayload, String> {
    let parts: Vec<&str> = raw.split(':').map(str::trim).collect();
    let [product_id, quantity, unit_price] = parts.as_slice() else {
        return Err(format!(
            "expected PRODUCT_ID:QUANTITY:UNIT_PRICE, got '{}'",
            raw
        ));
    };
    if product_id.is_empty() {
        return Err("product id is empty".to_string());
    }
    let quantity: u32 = quantity
        .parse()
        .map_err(|_| format!("invalid quantity '{}'", quantity))?;
    if quantity == 0 {
        return Err("quantity must be at least 1".to_string());
    }
    let unit_price: f64 = unit_price
        .parse()
        .map_err(|_| format!("invalid unit price '{}'", unit_price))?;
    Ok(LineItemPayload {
        product_id: product_id.to_string(),
        quantity,
        unit_price,
    })
}

fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

fn prompt(label: &str) -> Result<String> {
    print!("{}", label);
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    Ok(line.trim().to_string())
}

impl CommandContext {
    /// Render one listing page as a numbered table with a pagination footer.
    fn show_page<T: Serialize>(
        &self,
        page: &Paginated<T>,
        limit: u32,
        headers: &[&'static str],
        row: impl Fn(&T) -> Vec<String>,
    ) -> Result<()> {
        if self.json {
            return output::print_json(page);
        }
        let mut columns = vec!["#"];
        columns.extend_from_slice(headers);
        let mut table = Table::new(&columns);
        for (i, item) in page.data.iter().enumerate() {
            let mut cells = vec![page.pagination.row_number(i, limit).to_string()];
            cells.extend(row(item));
            table.row(cells);
        }
        table.print();
        if !page.data.is_empty() {
            println!("\n{}", output::page_footer(&page.pagination, limit));
        }
        Ok(())
    }

    /// Render a record as aligned `label: value` lines.
    fn show_record<T: Serialize>(&self, value: &T, fields: Vec<(&str, String)>) -> Result<()> {
        if self.json {
            return output::print_json(value);
        }
        let width = fields.iter().map(|(label, _)| label.len()).max().unwrap_or(0);
        for (label, value) in fields {
            println!("{:<width$}  {}", label, value, width = width);
        }
        Ok(())
    }
}

fn done(message: &str) {
    info!("{}", message);
    println!("{}", message);
}

impl Commands {
    pub async fn execute(self, ctx: &mut CommandContext) -> Result<()> {
        match self {
            Commands::Login { email } => login(ctx, email).await,
            Commands::Logout => {
                ctx.client.logout().await;
                done("Logged out.");
                Ok(())
            }
            Commands::Whoami => {
                let user = ctx.client.profile().await?;
                ctx.show_record(
                    &user,
                    vec![
                        ("Name", user.fullname.clone()),
                        ("Email", user.email.clone()),
                        ("ID", user.id.clone()),
                        ("Since", user.created_at.as_deref().map(format_date).unwrap_or_default()),
                    ],
                )
            }
            Commands::UpdateProfile { fullname } => {
                ctx.client.update_profile(&fullname).await?;
                done("Profile updated.");
                Ok(())
            }
            Commands::CreateUser { email, fullname } => {
                let password = rpassword::prompt_password(format!("Password for {}: ", email))?;
                if password.is_empty() {
                    bail!("Password is required");
                }
                ctx.client
                    .create_user(&CreateUserPayload {
                        email,
                        password,
                        fullname,
                    })
                    .await?;
                done("User created.");
                Ok(())
            }
            Commands::Dashboard { period } => dashboard(ctx, period).await,
            Commands::Categories { command } => command.execute(ctx).await,
            Commands::Stores { command } => command.execute(ctx).await,
            Commands::Products { command } => command.execute(ctx).await,
            Commands::Stock { command } => command.execute(ctx).await,
            Commands::Quotations { command } => command.execute(ctx).await,
            Commands::Purchases { command } => command.execute(ctx).await,
            Commands::Akuns { command } => command.execute(ctx).await,
            Commands::Report {
                kind,
                period,
                from,
                to,
                store,
                category,
                product,
                movement_type,
                output,
            } => {
                let mut params = match (from, to) {
                    (Some(start), Some(end)) => {
                        if end < start {
                            bail!("--to must not be before --from");
                        }
                        ReportParams::custom(start, end)
                    }
                    _ => ReportParams {
                        filter_type: period,
                        ..ReportParams::default()
                    },
                };
                params.store_id = store;
                params.category_id = category;
                params.product_id = product;
                params.movement_type = movement_type;

                let bytes = ctx.client.generate_report(kind, &params).await?;
                let path = output::save_pdf(&bytes, output, kind.file_stem())?;
                done(&format!("Report saved to {}", path.display()));
                Ok(())
            }
        }
    }
}

async fn login(ctx: &mut CommandContext, email: Option<String>) -> Result<()> {
    let email = match email {
        Some(email) => email,
        None => {
            let remembered = ctx.config.last_email.clone();
            let label = match &remembered {
                Some(last) => format!("Email [{}]: ", last),
                None => "Email: ".to_string(),
            };
            let entered = prompt(&label)?;
            match remembered {
                Some(last) if entered.is_empty() => last,
                _ => entered,
            }
        }
    };
    let password = rpassword::prompt_password("Password: ")?;
    if email.is_empty() || password.is_empty() {
        bail!("Email and password required");
    }

    ctx.client.login(&email, &password).await?;

    ctx.config.last_email = Some(email.clone());
    if let Err(e) = ctx.config.save() {
        warn!(error = %e, "Failed to save config");
    }
    done(&format!("Logged in as {}.", email));
    Ok(())
}

async fn dashboard(ctx: &CommandContext, period: TimeFilter) -> Result<()> {
    let (general, specific) = futures::try_join!(
        ctx.client.dashboard_general(),
        ctx.client.dashboard_specific(period)
    )?;

    if ctx.json {
        return output::print_json(&serde_json::json!({
            "general": general,
            "specific": specific,
        }));
    }

    println!("Users        {:>12}", format_number(general.total_users as f64));
    println!("Products     {:>12}", format_number(general.total_products as f64));
    println!("Categories   {:>12}", format_number(general.total_categories as f64));
    println!("Stores       {:>12}", format_number(general.total_stores as f64));
    println!();
    println!("{}", period.label());
    println!("  Sales        {}", format_currency(specific.sales_total));
    println!("  Purchases    {}", format_currency(specific.purchases_total));
    println!("  Transactions {}", format_number(specific.transactions_count as f64));

    if !specific.recent_transactions.is_empty() {
        println!();
        let mut table = Table::new(&["Reference", "Type", "Amount", "Date"]);
        for tx in &specific.recent_transactions {
            table.row(vec![
                tx.id.clone(),
                capitalize_first(&tx.transaction_type),
                format_currency(tx.amount),
                format_date(&tx.date),
            ]);
        }
        table.print();
    }
    Ok(())
}

impl CategoryCommands {
    async fn execute(self, ctx: &CommandContext) -> Result<()> {
        let client = &ctx.client;
        match self {
            CategoryCommands::List(list) => {
                let page = client.list_categories(&list.query()).await?;
                ctx.show_page(&page, list.limit, &["ID", "Name", "Description"], |c| {
                    vec![c.id.clone(), c.name.clone(), opt(&c.description)]
                })
            }
            CategoryCommands::Show { id } => {
                let category = client.category(&id).await?;
                ctx.show_record(
                    &category,
                    vec![
                        ("ID", category.id.clone()),
                        ("Name", category.name.clone()),
                        ("Description", opt(&category.description)),
                    ],
                )
            }
            CategoryCommands::Create { name, description } => {
                client
                    .create_category(&CategoryPayload {
                        id: None,
                        name,
                        description,
                    })
                    .await?;
                done("Category created.");
                Ok(())
            }
            CategoryCommands::Update {
                id,
                name,
                description,
            } => {
                client
                    .update_category(&CategoryPayload {
                        id: Some(id),
                        name,
                        description,
                    })
                    .await?;
                done("Category updated.");
                Ok(())
            }
            CategoryCommands::Delete { id } => {
                client.delete_category(&id).await?;
                done("Category deleted.");
                Ok(())
            }
        }
    }
}

impl StoreCommands {
    async fn execute(self, ctx: &CommandContext) -> Result<()> {
        let client = &ctx.client;
        match self {
            StoreCommands::List(list) => {
                let page = client.list_stores(&list.query()).await?;
                ctx.show_page(&page, list.limit, &["ID", "Name", "Location", "Manager"], |s| {
                    vec![
                        s.id.clone(),
                        s.name.clone(),
                        opt(&s.location),
                        opt(&s.manager),
                    ]
                })
            }
            StoreCommands::Show { id } => {
                let store = client.store(&id).await?;
                ctx.show_record(
                    &store,
                    vec![
                        ("ID", store.id.clone()),
                        ("Name", store.name.clone()),
                        ("Location", opt(&store.location)),
                        ("Manager", opt(&store.manager)),
                        ("Contact", opt(&store.contact_info)),
                        ("Phone", opt(&store.phone)),
                        ("Email", opt(&store.email)),
                        ("Address", opt(&store.address)),
                    ],
                )
            }
            StoreCommands::Create(args) => {
                client.create_store(&args.payload(None)).await?;
                done("Store created.");
                Ok(())
            }
            StoreCommands::Update { id, store } => {
                client.update_store(&store.payload(Some(id))).await?;
                done("Store updated.");
                Ok(())
            }
            StoreCommands::Delete { id } => {
                client.delete_store(&id).await?;
                done("Store deleted.");
                Ok(())
            }
        }
    }
}

impl ProductCommands {
    async fn execute(self, ctx: &CommandContext) -> Result<()> {
        let client = &ctx.client;
        match self {
            ProductCommands::List { list, category } => {
                let filter = ProductFilter {
                    category_id: category,
                };
                let page = client.list_products(&list.query(), &filter).await?;
                ctx.show_page(
                    &page,
                    list.limit,
                    &["ID", "SKU", "Name", "Category", "Sell", "Cost", "Unit"],
                    |p| {
                        vec![
                            p.id.clone(),
                            opt(&p.sku),
                            p.name.clone(),
                            opt(&p.category_name),
                            currency_str(&p.price_sell),
                            currency_str(&p.price_cost),
                            p.satuan.clone(),
                        ]
                    },
                )
            }
            ProductCommands::Show { id } => {
                let product = client.product(&id).await?;
                let category = product
                    .category
                    .as_ref()
                    .map(|c| c.name.clone())
                    .unwrap_or_else(|| "-".to_string());
                ctx.show_record(
                    &product,
                    vec![
                        ("ID", product.id.clone()),
                        ("Name", product.name.clone()),
                        ("SKU", opt(&product.sku)),
                        ("Category", category),
                        ("Sell price", currency_str(&product.price_sell)),
                        ("Cost price", currency_str(&product.price_cost)),
                        ("Unit", product.satuan.clone()),
                        ("Description", opt(&product.description)),
                    ],
                )
            }
            ProductCommands::Create(args) => {
                client.create_product(&args.payload(None)).await?;
                done("Product created.");
                Ok(())
            }
            ProductCommands::Update { id, product } => {
                client.update_product(&product.payload(Some(id))).await?;
                done("Product updated.");
                Ok(())
            }
            ProductCommands::Delete { id } => {
                client.delete_product(&id).await?;
                done("Product deleted.");
                Ok(())
            }
        }
    }
}

impl StockCommands {
    async fn execute(self, ctx: &CommandContext) -> Result<()> {
        let client = &ctx.client;
        match self {
            StockCommands::List {
                list,
                store,
                product,
                movement_type,
                from,
                to,
            } => {
                let filter = StockMovementFilter {
                    store_id: store,
                    product_id: product,
                    movement_type,
                    start_date: from,
                    end_date: to,
                };
                let page = client.list_stock_movements(&list.query(), &filter).await?;
                ctx.show_page(
                    &page,
                    list.limit,
                    &["ID", "Date", "Product", "Store", "Qty", "Note"],
                    |m| {
                        vec![
                            m.id.to_string(),
                            m.created_at.as_deref().map(format_date).unwrap_or_default(),
                            m.product_name.clone().unwrap_or_else(|| m.product_id.clone()),
                            m.store_name.clone().unwrap_or_else(|| m.store_id.clone()),
                            format!("{:+}", m.signed_quantity()),
                            opt(&m.note),
                        ]
                    },
                )
            }
            StockCommands::Show { id } => {
                let movement = client.stock_movement(id).await?;
                ctx.show_record(
                    &movement,
                    vec![
                        ("ID", movement.id.to_string()),
                        ("Type", movement.movement_type.to_string()),
                        (
                            "Product",
                            movement
                                .product_name
                                .clone()
                                .unwrap_or_else(|| movement.product_id.clone()),
                        ),
                        (
                            "Store",
                            movement
                                .store_name
                                .clone()
                                .unwrap_or_else(|| movement.store_id.clone()),
                        ),
                        ("Quantity", movement.quantity.to_string()),
                        ("Reference", opt(&movement.reference_id)),
                        ("Note", opt(&movement.note)),
                        (
                            "Date",
                            movement.created_at.as_deref().map(format_date).unwrap_or_default(),
                        ),
                    ],
                )
            }
            StockCommands::Record {
                product,
                store,
                quantity,
                movement_type,
                note,
            } => {
                client
                    .create_stock_movement(&CreateStockMovementPayload {
                        product_id: product,
                        store_id: store,
                        quantity,
                        movement_type,
                        note,
                        reference_id: None,
                        reference_type: None,
                    })
                    .await?;
                done("Stock movement recorded.");
                Ok(())
            }
        }
    }
}

impl QuotationCommands {
    async fn execute(self, ctx: &CommandContext) -> Result<()> {
        let client = &ctx.client;
        match self {
            QuotationCommands::List {
                list,
                status,
                from,
                to,
            } => {
                let filter = QuotationFilter {
                    status,
                    start_date: from,
                    end_date: to,
                };
                let page = client.list_quotations(&list.query(), &filter).await?;
                ctx.show_page(
                    &page,
                    list.limit,
                    &["ID", "Number", "Date", "Customer", "Total", "Status"],
                    |q| {
                        vec![
                            q.id.to_string(),
                            q.quotation_number.clone(),
                            format_date(&q.quotation_date),
                            q.customer_name.clone().unwrap_or_else(|| q.customer_id.to_string()),
                            format_currency(q.grand_total),
                            capitalize_first(&q.status),
                        ]
                    },
                )
            }
            QuotationCommands::Show { id } => {
                let detail = client.quotation(id).await?;
                if ctx.json {
                    return output::print_json(&detail);
                }
                let q = &detail.quotation;
                ctx.show_record(
                    &detail,
                    vec![
                        ("Number", q.quotation_number.clone()),
                        ("Date", format_date(&q.quotation_date)),
                        ("Customer", q.customer_name.clone().unwrap_or_else(|| q.customer_id.to_string())),
                        ("Store", q.store_name.clone().unwrap_or_else(|| q.store_id.to_string())),
                        ("Status", capitalize_first(&q.status)),
                        ("Subtotal", format_currency(q.subtotal)),
                        ("Discount", format_currency(q.discount_amount)),
                        ("Total", format_currency(q.grand_total)),
                        ("Notes", opt(&q.notes)),
                    ],
                )?;
                println!();
                let mut table = Table::new(&["Product", "Qty", "Unit price", "Subtotal"]);
                for item in &detail.items {
                    table.row(vec![
                        item.product_name.clone().unwrap_or_else(|| item.product_id.clone()),
                        item.quantity.to_string(),
                        format_currency(item.unit_price),
                        format_currency(item.subtotal),
                    ]);
                }
                table.print();
                Ok(())
            }
            QuotationCommands::Create {
                customer,
                store,
                date,
                items,
                discount,
                notes,
            } => {
                let payload = CreateQuotationPayload {
                    customer_id: customer,
                    store_id: store,
                    quotation_date: date.unwrap_or_else(today),
                    items,
                    notes,
                    discount_amount: discount,
                };
                let subtotal = payload.subtotal();
                if let Some(discount) = discount {
                    if discount > subtotal {
                        bail!(
                            "Discount {} exceeds subtotal {}",
                            format_currency(discount),
                            format_currency(subtotal)
                        );
                    }
                }
                client.create_quotation(&payload).await?;
                done(&format!(
                    "Quotation created ({} items, subtotal {}).",
                    payload.items.len(),
                    format_currency(subtotal)
                ));
                Ok(())
            }
            QuotationCommands::Status { id, status } => {
                client.update_quotation_status(id, &status).await?;
                done(&format!("Quotation {} marked {}.", id, status));
                Ok(())
            }
            QuotationCommands::Pdf { id, output } => {
                let bytes = client.export_quotation_pdf(id).await?;
                let path = output::save_pdf(&bytes, output, &format!("quotation-{}", id))?;
                done(&format!("Saved {}", path.display()));
                Ok(())
            }
        }
    }
}

impl PurchaseCommands {
    async fn execute(self, ctx: &CommandContext) -> Result<()> {
        let client = &ctx.client;
        match self {
            PurchaseCommands::List {
                list,
                status,
                payment_status,
                from,
                to,
            } => {
                let filter = PurchaseFilter {
                    status,
                    payment_status,
                    start_date: from,
                    end_date: to,
                };
                let page = client.list_purchases(&list.query(), &filter).await?;
                ctx.show_page(
                    &page,
                    list.limit,
                    &["ID", "Invoice", "Date", "Supplier", "Total", "Status", "Payment"],
                    |p| {
                        vec![
                            p.id.to_string(),
                            p.invoice_number.clone(),
                            format_date(&p.purchase_date),
                            p.supplier_name.clone().unwrap_or_else(|| p.supplier_id.to_string()),
                            format_currency(p.grand_total),
                            capitalize_first(&p.status),
                            capitalize_first(&p.payment_status),
                        ]
                    },
                )
            }
            PurchaseCommands::Show { id } => {
                let detail = client.purchase(id).await?;
                if ctx.json {
                    return output::print_json(&detail);
                }
                let p = &detail.purchase;
                ctx.show_record(
                    &detail,
                    vec![
                        ("Invoice", p.invoice_number.clone()),
                        ("Date", format_date(&p.purchase_date)),
                        ("Supplier", p.supplier_name.clone().unwrap_or_else(|| p.supplier_id.to_string())),
                        ("Store", p.store_name.clone().unwrap_or_else(|| p.store_id.to_string())),
                        ("Status", capitalize_first(&p.status)),
                        ("Payment", capitalize_first(&p.payment_status)),
                        ("Due", p.payment_due_date.as_deref().map(format_date).unwrap_or_default()),
                        ("Subtotal", format_currency(p.subtotal)),
                        ("Tax", format_currency(p.tax_amount)),
                        ("Discount", format_currency(p.discount_amount)),
                        ("Total", format_currency(p.grand_total)),
                        ("Notes", opt(&p.notes)),
                    ],
                )?;
                println!();
                let mut table = Table::new(&["Product", "Qty", "Unit price", "Subtotal"]);
                for item in &detail.items {
                    table.row(vec![
                        item.product_name.clone().unwrap_or_else(|| item.product_id.clone()),
                        item.quantity.to_string(),
                        format_currency(item.unit_price),
                        format_currency(item.subtotal),
                    ]);
                }
                table.print();
                Ok(())
            }
            PurchaseCommands::Create {
                supplier,
                store,
                date,
                due,
                items,
                tax,
                discount,
                notes,
            } => {
                let purchase_date = date.unwrap_or_else(today);
                if due < purchase_date {
                    bail!("--due must not be before the purchase date");
                }
                client
                    .create_purchase(&CreatePurchasePayload {
                        supplier_id: supplier,
                        store_id: store,
                        purchase_date,
                        payment_due_date: due,
                        items,
                        notes,
                        tax_amount: tax,
                        discount_amount: discount,
                    })
                    .await?;
                done("Purchase created.");
                Ok(())
            }
            PurchaseCommands::Status { id, status } => {
                client.update_purchase_status(id, &status).await?;
                done(&format!("Purchase {} marked {}.", id, status));
                Ok(())
            }
            PurchaseCommands::Payment { id, status } => {
                client.update_purchase_payment_status(id, &status).await?;
                done(&format!("Purchase {} payment marked {}.", id, status));
                Ok(())
            }
            PurchaseCommands::Pdf { id, output } => {
                let bytes = client.export_purchase_pdf(id).await?;
                let path = output::save_pdf(&bytes, output, &format!("purchase-{}", id))?;
                done(&format!("Saved {}", path.display()));
                Ok(())
            }
        }
    }
}

impl AkunCommands {
    async fn execute(self, ctx: &CommandContext) -> Result<()> {
        let client = &ctx.client;
        match self {
            AkunCommands::List { list, akun_type } => {
                let filter = AkunFilter { akun_type };
                let page = client.list_akuns(&list.query(), &filter).await?;
                ctx.show_page(
                    &page,
                    list.limit,
                    &["ID", "Name", "Type", "Phone", "Email"],
                    |a| {
                        vec![
                            a.id.to_string(),
                            a.name.clone(),
                            capitalize_first(&a.akun_type.to_string()),
                            opt(&a.phone),
                            opt(&a.email),
                        ]
                    },
                )
            }
            AkunCommands::Show { id } => {
                let akun = client.akun(id).await?;
                ctx.show_record(
                    &akun,
                    vec![
                        ("ID", akun.id.to_string()),
                        ("Name", akun.name.clone()),
                        ("Type", capitalize_first(&akun.akun_type.to_string())),
                        ("Phone", opt(&akun.phone)),
                        ("Email", opt(&akun.email)),
                        ("Address", opt(&akun.address)),
                    ],
                )
            }
            AkunCommands::Create(args) => {
                client.create_akun(&args.payload(None)).await?;
                done("Akun created.");
                Ok(())
            }
            AkunCommands::Update { id, akun } => {
                client.update_akun(&akun.payload(Some(id))).await?;
                done("Akun updated.");
                Ok(())
            }
            AkunCommands::Delete { id } => {
                client.delete_akun(id).await?;
                done("Akun deleted.");
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_line_item() {
        let item = parse_line_item("p1:2:45000").unwrap();
        assert_eq!(item.product_id, "p1");
        assert_eq!(item.quantity, 2);
        assert_eq!(item.unit_price, 45000.0);
    }

    #[test]
    fn test_parse_line_item_rejects_bad_input() {
        assert!(parse_line_item("p1:2").is_err());
        assert!(parse_line_item(":2:100").is_err());
        assert!(parse_line_item("p1:0:100").is_err());
        assert!(parse_line_item("p1:two:100").is_err());
    }

    #[test]
    fn test_list_args_build_query() {
        let args = ListArgs {
            page: 0,
            limit: 25,
            search: Some("  ".to_string()),
            sort: Some("name".to_string()),
            desc: true,
        };
        let query = args.query();
        assert_eq!(query.page, 1);
        assert_eq!(query.limit, 25);
        assert_eq!(query.search, None);
        assert_eq!(query.sort_order, Some(SortOrder::Desc));
    }
}
