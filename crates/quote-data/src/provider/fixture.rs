//! 픽스처 데이터 제공자.
//!
//! 업스트림 없이 서버를 돌리기 위한 결정론적 인프로세스 데이터셋.
//! 개발 환경과 테스트에서 실제 제공자 대신 사용됩니다
//! (`USE_LIVE_QUOTES` 미설정 시 기본값).
//!
//! 차트는 종목별 기준 가격에서 출발하는 의사난수 기하 랜덤워크로
//! 합성합니다. 시드를 보존하지 않으므로 호출 간 재현되지 않습니다.
//! 금융 시뮬레이션이 아니라 표시용 근사치입니다.

use async_trait::async_trait;
use chrono::{Duration as ChronoDuration, Utc};
use quote_core::{ChartInterval, ChartPeriod, QuoteError, QuoteResult, TickerSymbol};
use rand::Rng;

use crate::model::{ChartPoint, CompanyProfile, DividendPayment, FinancialSummary, StockInfo};
use crate::provider::QuoteProvider;

/// 픽스처 종목 행.
struct FixtureRow {
    symbol: &'static str,
    name: &'static str,
    exchange: &'static str,
    sector: &'static str,
    industry: &'static str,
    price: f64,
    previous_close: f64,
    market_cap: f64,
    pe_ratio: f64,
    /// 배당수익률 (%), 0.0이면 무배당
    dividend_yield: f64,
    beta: f64,
    volume: i64,
    description_en: Option<&'static str>,
    description_ko: Option<&'static str>,
}

/// 픽스처 데이터셋 (대형주 위주, 시가총액 내림차순 아님).
static FIXTURE_ROWS: &[FixtureRow] = &[
    FixtureRow {
        symbol: "AAPL",
        name: "Apple Inc.",
        exchange: "NASDAQ",
        sector: "Technology",
        industry: "Consumer Electronics",
        price: 214.29,
        previous_close: 212.44,
        market_cap: 3_280_000_000_000.0,
        pe_ratio: 33.4,
        dividend_yield: 0.44,
        beta: 1.24,
        volume: 54_120_000,
        description_en: Some(
            "Apple Inc. designs, manufactures and markets smartphones, personal computers, \
             tablets, wearables and accessories, and sells a variety of related services.",
        ),
        description_ko: Some(
            "애플은 스마트폰, 개인용 컴퓨터, 태블릿, 웨어러블 기기와 액세서리를 설계·제조·판매하며 \
             다양한 관련 서비스를 제공하는 기업입니다.",
        ),
    },
    FixtureRow {
        symbol: "MSFT",
        name: "Microsoft Corporation",
        exchange: "NASDAQ",
        sector: "Technology",
        industry: "Software - Infrastructure",
        price: 457.36,
        previous_close: 452.18,
        market_cap: 3_400_000_000_000.0,
        pe_ratio: 37.8,
        dividend_yield: 0.72,
        beta: 0.90,
        volume: 21_480_000,
        description_en: Some(
            "Microsoft Corporation develops and supports software, services, devices and \
             solutions worldwide, including the Azure cloud platform and the Office suite.",
        ),
        description_ko: Some(
            "마이크로소프트는 Azure 클라우드 플랫폼과 Office 제품군을 포함한 소프트웨어, 서비스, \
             디바이스, 솔루션을 전 세계에 개발·지원하는 기업입니다.",
        ),
    },
    FixtureRow {
        symbol: "GOOGL",
        name: "Alphabet Inc.",
        exchange: "NASDAQ",
        sector: "Communication Services",
        industry: "Internet Content & Information",
        price: 182.61,
        previous_close: 184.02,
        market_cap: 2_250_000_000_000.0,
        pe_ratio: 26.1,
        dividend_yield: 0.43,
        beta: 1.05,
        volume: 28_940_000,
        description_en: Some(
            "Alphabet Inc. offers various products and platforms including Search, YouTube, \
             Android, Chrome and Google Cloud.",
        ),
        description_ko: Some(
            "알파벳은 검색, 유튜브, 안드로이드, 크롬, 구글 클라우드 등 다양한 제품과 플랫폼을 \
             제공하는 구글의 지주회사입니다.",
        ),
    },
    FixtureRow {
        symbol: "AMZN",
        name: "Amazon.com Inc.",
        exchange: "NASDAQ",
        sector: "Consumer Cyclical",
        industry: "Internet Retail",
        price: 218.94,
        previous_close: 215.71,
        market_cap: 2_330_000_000_000.0,
        pe_ratio: 46.3,
        dividend_yield: 0.0,
        beta: 1.15,
        volume: 39_760_000,
        description_en: Some(
            "Amazon.com Inc. engages in the retail sale of consumer products and subscriptions \
             and offers cloud computing through Amazon Web Services.",
        ),
        description_ko: Some(
            "아마존은 소비재 소매 판매와 구독 서비스를 운영하며 아마존 웹 서비스(AWS)를 통해 \
             클라우드 컴퓨팅을 제공하는 기업입니다.",
        ),
    },
    FixtureRow {
        symbol: "TSLA",
        name: "Tesla Inc.",
        exchange: "NASDAQ",
        sector: "Consumer Cyclical",
        industry: "Auto Manufacturers",
        price: 246.88,
        previous_close: 251.30,
        market_cap: 790_000_000_000.0,
        pe_ratio: 68.9,
        dividend_yield: 0.0,
        beta: 2.29,
        volume: 88_340_000,
        description_en: Some(
            "Tesla Inc. designs, develops, manufactures and sells electric vehicles, and energy \
             generation and storage systems.",
        ),
        description_ko: Some(
            "테슬라는 전기차와 에너지 생성·저장 시스템을 설계, 개발, 제조, 판매하는 기업입니다.",
        ),
    },
    FixtureRow {
        symbol: "META",
        name: "Meta Platforms Inc.",
        exchange: "NASDAQ",
        sector: "Communication Services",
        industry: "Internet Content & Information",
        price: 672.50,
        previous_close: 665.83,
        market_cap: 1_700_000_000_000.0,
        pe_ratio: 28.4,
        dividend_yield: 0.31,
        beta: 1.21,
        volume: 12_570_000,
        description_en: Some(
            "Meta Platforms Inc. builds products that enable people to connect and share through \
             mobile devices, including Facebook, Instagram and WhatsApp.",
        ),
        description_ko: Some(
            "메타는 페이스북, 인스타그램, 왓츠앱 등 사람들이 모바일 기기로 연결하고 공유할 수 있는 \
             제품을 만드는 기업입니다.",
        ),
    },
    FixtureRow {
        symbol: "NVDA",
        name: "NVIDIA Corporation",
        exchange: "NASDAQ",
        sector: "Technology",
        industry: "Semiconductors",
        price: 131.26,
        previous_close: 128.44,
        market_cap: 3_210_000_000_000.0,
        pe_ratio: 51.7,
        dividend_yield: 0.03,
        beta: 1.67,
        volume: 214_800_000,
        description_en: Some(
            "NVIDIA Corporation provides graphics, compute and networking solutions, including \
             GPUs for gaming and data centers.",
        ),
        description_ko: Some(
            "엔비디아는 게임·데이터센터용 GPU를 비롯한 그래픽, 컴퓨팅, 네트워킹 솔루션을 제공하는 \
             반도체 기업입니다.",
        ),
    },
    FixtureRow {
        symbol: "NFLX",
        name: "Netflix Inc.",
        exchange: "NASDAQ",
        sector: "Communication Services",
        industry: "Entertainment",
        price: 1021.40,
        previous_close: 1009.75,
        market_cap: 436_000_000_000.0,
        pe_ratio: 48.2,
        dividend_yield: 0.0,
        beta: 1.28,
        volume: 2_870_000,
        description_en: None,
        description_ko: None,
    },
    FixtureRow {
        symbol: "JPM",
        name: "JPMorgan Chase & Co.",
        exchange: "NYSE",
        sector: "Financial Services",
        industry: "Banks - Diversified",
        price: 265.32,
        previous_close: 263.14,
        market_cap: 742_000_000_000.0,
        pe_ratio: 13.5,
        dividend_yield: 1.89,
        beta: 1.10,
        volume: 8_420_000,
        description_en: None,
        description_ko: None,
    },
    FixtureRow {
        symbol: "JNJ",
        name: "Johnson & Johnson",
        exchange: "NYSE",
        sector: "Healthcare",
        industry: "Drug Manufacturers - General",
        price: 156.70,
        previous_close: 157.02,
        market_cap: 377_000_000_000.0,
        pe_ratio: 16.8,
        dividend_yield: 3.17,
        beta: 0.52,
        volume: 6_980_000,
        description_en: None,
        description_ko: None,
    },
    FixtureRow {
        symbol: "V",
        name: "Visa Inc.",
        exchange: "NYSE",
        sector: "Financial Services",
        industry: "Credit Services",
        price: 352.18,
        previous_close: 349.95,
        market_cap: 690_000_000_000.0,
        pe_ratio: 32.6,
        dividend_yield: 0.67,
        beta: 0.95,
        volume: 5_310_000,
        description_en: None,
        description_ko: None,
    },
    FixtureRow {
        symbol: "PG",
        name: "Procter & Gamble Co.",
        exchange: "NYSE",
        sector: "Consumer Defensive",
        industry: "Household & Personal Products",
        price: 168.43,
        previous_close: 167.88,
        market_cap: 396_000_000_000.0,
        pe_ratio: 26.9,
        dividend_yield: 2.41,
        beta: 0.41,
        volume: 6_140_000,
        description_en: None,
        description_ko: None,
    },
    FixtureRow {
        symbol: "UNH",
        name: "UnitedHealth Group Inc.",
        exchange: "NYSE",
        sector: "Healthcare",
        industry: "Healthcare Plans",
        price: 521.64,
        previous_close: 515.97,
        market_cap: 480_000_000_000.0,
        pe_ratio: 20.3,
        dividend_yield: 1.61,
        beta: 0.56,
        volume: 3_260_000,
        description_en: None,
        description_ko: None,
    },
    FixtureRow {
        symbol: "HD",
        name: "Home Depot Inc.",
        exchange: "NYSE",
        sector: "Consumer Cyclical",
        industry: "Home Improvement Retail",
        price: 402.75,
        previous_close: 398.20,
        market_cap: 400_000_000_000.0,
        pe_ratio: 26.7,
        dividend_yield: 2.28,
        beta: 0.98,
        volume: 2_910_000,
        description_en: None,
        description_ko: None,
    },
    FixtureRow {
        symbol: "DIS",
        name: "Walt Disney Co.",
        exchange: "NYSE",
        sector: "Communication Services",
        industry: "Entertainment",
        price: 112.56,
        previous_close: 111.04,
        market_cap: 204_000_000_000.0,
        pe_ratio: 38.1,
        dividend_yield: 0.89,
        beta: 1.39,
        volume: 9_370_000,
        description_en: None,
        description_ko: None,
    },
    FixtureRow {
        symbol: "PYPL",
        name: "PayPal Holdings Inc.",
        exchange: "NASDAQ",
        sector: "Financial Services",
        industry: "Credit Services",
        price: 78.92,
        previous_close: 80.03,
        market_cap: 78_000_000_000.0,
        pe_ratio: 17.2,
        dividend_yield: 0.0,
        beta: 1.45,
        volume: 10_280_000,
        description_en: None,
        description_ko: None,
    },
    FixtureRow {
        symbol: "ADBE",
        name: "Adobe Inc.",
        exchange: "NASDAQ",
        sector: "Technology",
        industry: "Software - Application",
        price: 428.10,
        previous_close: 433.57,
        market_cap: 186_000_000_000.0,
        pe_ratio: 25.8,
        dividend_yield: 0.0,
        beta: 1.30,
        volume: 2_650_000,
        description_en: None,
        description_ko: None,
    },
    FixtureRow {
        symbol: "CRM",
        name: "Salesforce Inc.",
        exchange: "NYSE",
        sector: "Technology",
        industry: "Software - Application",
        price: 276.34,
        previous_close: 273.90,
        market_cap: 264_000_000_000.0,
        pe_ratio: 43.6,
        dividend_yield: 0.58,
        beta: 1.32,
        volume: 4_890_000,
        description_en: None,
        description_ko: None,
    },
    FixtureRow {
        symbol: "INTC",
        name: "Intel Corporation",
        exchange: "NASDAQ",
        sector: "Technology",
        industry: "Semiconductors",
        price: 22.41,
        previous_close: 22.90,
        market_cap: 97_000_000_000.0,
        pe_ratio: 0.0,
        dividend_yield: 0.0,
        beta: 1.08,
        volume: 63_420_000,
        description_en: None,
        description_ko: None,
    },
    FixtureRow {
        symbol: "VZ",
        name: "Verizon Communications Inc.",
        exchange: "NYSE",
        sector: "Communication Services",
        industry: "Telecom Services",
        price: 42.87,
        previous_close: 42.55,
        market_cap: 180_000_000_000.0,
        pe_ratio: 10.4,
        dividend_yield: 6.31,
        beta: 0.44,
        volume: 18_730_000,
        description_en: None,
        description_ko: None,
    },
    FixtureRow {
        symbol: "PLTR",
        name: "Palantir Technologies Inc.",
        exchange: "NYSE",
        sector: "Technology",
        industry: "Software - Infrastructure",
        price: 141.85,
        previous_close: 136.62,
        market_cap: 334_000_000_000.0,
        pe_ratio: 0.0,
        dividend_yield: 0.0,
        beta: 2.74,
        volume: 71_940_000,
        description_en: None,
        description_ko: None,
    },
    FixtureRow {
        symbol: "BRK-B",
        name: "Berkshire Hathaway Inc.",
        exchange: "NYSE",
        sector: "Financial Services",
        industry: "Insurance - Diversified",
        price: 478.55,
        previous_close: 475.10,
        market_cap: 1_030_000_000_000.0,
        pe_ratio: 12.9,
        dividend_yield: 0.0,
        beta: 0.87,
        volume: 3_180_000,
        description_en: None,
        description_ko: None,
    },
    FixtureRow {
        symbol: "LLY",
        name: "Eli Lilly and Company",
        exchange: "NYSE",
        sector: "Healthcare",
        industry: "Drug Manufacturers - General",
        price: 812.33,
        previous_close: 803.11,
        market_cap: 772_000_000_000.0,
        pe_ratio: 64.2,
        dividend_yield: 0.74,
        beta: 0.42,
        volume: 2_740_000,
        description_en: None,
        description_ko: None,
    },
    FixtureRow {
        symbol: "TSM",
        name: "Taiwan Semiconductor Manufacturing",
        exchange: "NYSE",
        sector: "Technology",
        industry: "Semiconductors",
        price: 209.47,
        previous_close: 205.92,
        market_cap: 1_090_000_000_000.0,
        pe_ratio: 29.5,
        dividend_yield: 1.22,
        beta: 1.19,
        volume: 13_860_000,
        description_en: None,
        description_ko: None,
    },
];

/// 픽스처 제공자.
#[derive(Debug, Default)]
pub struct FixtureProvider;

impl FixtureProvider {
    /// 새 픽스처 제공자를 생성합니다.
    pub fn new() -> Self {
        Self
    }

    fn find_row(symbol: &TickerSymbol) -> QuoteResult<&'static FixtureRow> {
        FIXTURE_ROWS
            .iter()
            .find(|row| row.symbol == symbol.as_str())
            .ok_or_else(|| QuoteError::NotFound(symbol.as_str().to_string()))
    }
}

#[async_trait]
impl QuoteProvider for FixtureProvider {
    fn name(&self) -> &'static str {
        "fixture"
    }

    async fn fetch_quote(&self, symbol: &TickerSymbol) -> QuoteResult<StockInfo> {
        let row = Self::find_row(symbol)?;

        let none_if_zero = |v: f64| if v > 0.0 { Some(v) } else { None };

        Ok(StockInfo {
            symbol: row.symbol.to_string(),
            name: row.name.to_string(),
            current_price: row.price,
            previous_close: row.previous_close,
            change: 0.0,
            change_percent: 0.0,
            high: Some(row.price * 1.012),
            low: Some(row.price * 0.986),
            volume: Some(row.volume),
            market_cap: Some(row.market_cap),
            pe_ratio: none_if_zero(row.pe_ratio),
            dividend_yield: none_if_zero(row.dividend_yield),
            beta: Some(row.beta),
            fifty_two_week_high: Some(row.price * 1.25),
            fifty_two_week_low: Some(row.price * 0.72),
            avg_volume: Some(row.volume),
            currency: "USD".to_string(),
            exchange: Some(row.exchange.to_string()),
            sector: Some(row.sector.to_string()),
            industry: Some(row.industry.to_string()),
        })
    }

    async fn fetch_history(
        &self,
        symbol: &TickerSymbol,
        period: ChartPeriod,
        _interval: ChartInterval,
    ) -> QuoteResult<Vec<ChartPoint>> {
        let row = Self::find_row(symbol)?;

        // 기준 가격에서 출발하는 기하 랜덤워크 (일봉 기준).
        let days = period.approx_trading_days().max(1);
        let mut rng = rand::thread_rng();
        let start = Utc::now() - ChronoDuration::days(days as i64);

        let mut close = row.price * 0.88;
        let mut points = Vec::with_capacity(days);
        for day in 0..days {
            let open = close;
            close = open * (1.0 + rng.gen_range(-0.02..0.02));
            let high = open.max(close) * (1.0 + rng.gen_range(0.0..0.008));
            let low = open.min(close) * (1.0 - rng.gen_range(0.0..0.008));
            let volume =
                (row.volume as f64 * rng.gen_range(0.6..1.4)) as i64;

            let timestamp = start + ChronoDuration::days(day as i64);
            points.push(ChartPoint {
                timestamp: timestamp.to_rfc3339(),
                open,
                high,
                low,
                close,
                volume,
            });
        }

        Ok(points)
    }

    async fn fetch_financials(&self, symbol: &TickerSymbol) -> QuoteResult<FinancialSummary> {
        let row = Self::find_row(symbol)?;

        // PER에서 순이익을 역산하고 매출/영업이익을 비례로 합성
        let net_income = if row.pe_ratio > 0.0 {
            row.market_cap / row.pe_ratio
        } else {
            row.market_cap * 0.02
        };
        let revenue = net_income * 4.0;
        let operating_income = net_income * 1.2;

        Ok(FinancialSummary {
            symbol: row.symbol.to_string(),
            period: "TTM".to_string(),
            revenue: Some(revenue),
            net_income: Some(net_income),
            operating_income: Some(operating_income),
        })
    }

    async fn fetch_dividends(&self, symbol: &TickerSymbol) -> QuoteResult<Vec<DividendPayment>> {
        let row = Self::find_row(symbol)?;

        if row.dividend_yield <= 0.0 {
            return Ok(Vec::new());
        }

        // 분기별 지급 이력 10년치 합성
        let quarterly_amount =
            (row.price * row.dividend_yield / 100.0 / 4.0 * 100.0).round() / 100.0;
        let today = Utc::now().date_naive();

        let mut payments: Vec<DividendPayment> = (0i64..40)
            .map(|quarter| DividendPayment {
                symbol: row.symbol.to_string(),
                date: today - ChronoDuration::days(45 + 91 * quarter),
                amount: quarterly_amount,
                kind: "cash".to_string(),
            })
            .collect();

        payments.sort_by_key(|p| p.date);

        Ok(payments)
    }

    async fn fetch_profile(&self, symbol: &TickerSymbol) -> QuoteResult<CompanyProfile> {
        let row = Self::find_row(symbol)?;

        let original_description = row.description_en.map(str::to_string).unwrap_or_else(|| {
            format!(
                "{} is a U.S.-listed company operating in the {} sector ({}).",
                row.name, row.sector, row.industry
            )
        });
        let description = row.description_ko.map(str::to_string).unwrap_or_else(|| {
            format!(
                "{}은(는) {} 부문({})에 속한 미국 상장 기업입니다.",
                row.name, row.sector, row.industry
            )
        });

        Ok(CompanyProfile {
            symbol: row.symbol.to_string(),
            name: row.name.to_string(),
            sector: Some(row.sector.to_string()),
            industry: Some(row.industry.to_string()),
            country: Some("United States".to_string()),
            website: None,
            description: Some(description),
            original_description,
            employees: None,
            market_cap: Some(row.market_cap),
        })
    }
}
